use serde::Deserialize;

use super::model::{CompanyRef, JobRow, Relation};

/// Which optional relations to load alongside a job
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PopulateJob {
    pub company: bool,
}

impl PopulateJob {
    pub fn with_company() -> Self {
        PopulateJob { company: true }
    }

    /// Correlated sub-selects for every requested relation
    pub(crate) fn relations(&self) -> Vec<&'static RelationSelect> {
        RELATIONS
            .iter()
            .filter(|relation| (relation.requested)(self))
            .collect()
    }
}

/// A relation loaded through a correlated sub-select on the `j` alias
pub(crate) struct RelationSelect {
    pub alias: &'static str,
    pub sql: &'static str,
    requested: fn(&PopulateJob) -> bool,
}

fn company_requested(populate: &PopulateJob) -> bool {
    populate.company
}

const COMPANY: RelationSelect = RelationSelect {
    alias: "company",
    sql: "(SELECT json_build_object('id', c.id, 'name', c.name) \
          FROM companies AS c WHERE c.id = j.company_id)",
    requested: company_requested,
};

const RELATIONS: &[RelationSelect] = &[COMPANY];

/// Take the company out of a fetched row, according to what was requested
pub(crate) fn company(row: &mut JobRow, populate: &PopulateJob) -> Relation<CompanyRef> {
    if populate.company {
        Relation::Loaded(row.company.take().map(|json| json.0))
    } else {
        Relation::NotRequested
    }
}
