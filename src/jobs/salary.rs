use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pay period a salary range refers to
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
}

impl SalaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryPeriod::Yearly => "yearly",
            SalaryPeriod::Monthly => "monthly",
            SalaryPeriod::Weekly => "weekly",
            SalaryPeriod::Daily => "daily",
            SalaryPeriod::Hourly => "hourly",
        }
    }
}

impl fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown salary period '{0}'")]
pub struct SalaryDecodeError(pub String);

impl FromStr for SalaryPeriod {
    type Err = SalaryDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(SalaryPeriod::Yearly),
            "monthly" => Ok(SalaryPeriod::Monthly),
            "weekly" => Ok(SalaryPeriod::Weekly),
            "daily" => Ok(SalaryPeriod::Daily),
            "hourly" => Ok(SalaryPeriod::Hourly),
            other => Err(SalaryDecodeError(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Nested salary value as exposed on a job.
///
/// Every sub-field is always present; a null column becomes `None`
/// rather than dropping the field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Salary {
    pub currency: Option<String>,
    pub period: Option<SalaryPeriod>,
    pub value: SalaryRange,
}

/// The four flat `salary_*` columns of the `jobs` table
#[derive(Debug, FromRow, Clone, PartialEq, Eq, Default)]
pub struct SalaryColumns {
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub salary_min_value: Option<i64>,
    pub salary_max_value: Option<i64>,
}

/// Flatten a salary into its stored columns
pub fn encode(salary: &Salary) -> SalaryColumns {
    SalaryColumns {
        salary_currency: salary.currency.clone(),
        salary_period: salary.period.map(|p| p.as_str().to_string()),
        salary_min_value: salary.value.min,
        salary_max_value: salary.value.max,
    }
}

/// Rebuild the nested salary from its stored columns.
///
/// Null columns are tolerated. Only a period string outside the known set is rejected.
pub fn decode(columns: SalaryColumns) -> Result<Salary, SalaryDecodeError> {
    let period = columns
        .salary_period
        .as_deref()
        .map(SalaryPeriod::from_str)
        .transpose()?;

    Ok(Salary {
        currency: columns.salary_currency,
        period,
        value: SalaryRange {
            min: columns.salary_min_value,
            max: columns.salary_max_value,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_yearly(min: Option<i64>, max: Option<i64>) -> Salary {
        Salary {
            currency: Some("USD".to_string()),
            period: Some(SalaryPeriod::Yearly),
            value: SalaryRange { min, max },
        }
    }

    #[test]
    fn encode_flattens_every_component() {
        let columns = encode(&usd_yearly(Some(80_000), Some(120_000)));

        assert_eq!(columns.salary_currency.as_deref(), Some("USD"));
        assert_eq!(columns.salary_period.as_deref(), Some("yearly"));
        assert_eq!(columns.salary_min_value, Some(80_000));
        assert_eq!(columns.salary_max_value, Some(120_000));
    }

    #[test]
    fn decode_inverts_encode() {
        let salaries = [
            usd_yearly(Some(80_000), Some(120_000)),
            usd_yearly(None, Some(50)),
            usd_yearly(Some(10), None),
            usd_yearly(None, None),
            Salary {
                currency: Some("EUR".to_string()),
                period: Some(SalaryPeriod::Hourly),
                value: SalaryRange { min: Some(25), max: Some(40) },
            },
            Salary::default(),
        ];

        for salary in salaries {
            assert_eq!(decode(encode(&salary)).unwrap(), salary);
        }
    }

    #[test]
    fn decode_keeps_structure_when_all_columns_are_null() {
        let salary = decode(SalaryColumns::default()).unwrap();

        let json = serde_json::to_value(&salary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currency": null,
                "period": null,
                "value": { "min": null, "max": null }
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_period() {
        let columns = SalaryColumns {
            salary_period: Some("fortnightly".to_string()),
            ..Default::default()
        };

        assert_eq!(
            decode(columns),
            Err(SalaryDecodeError("fortnightly".to_string()))
        );
    }
}
