use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "birth_date_format")]
    pub birth_date: NaiveDate,
}

/// Mutable customer fields. Doubles as the POST/PUT request body; an `id` in
/// the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "birth_date_format")]
    pub birth_date: NaiveDate,
}

impl Entity for Customer {
    type Fields = CustomerFields;

    const NAME: &'static str = "Customer";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_parts(id: i64, fields: CustomerFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            birth_date: fields.birth_date,
        }
    }

    fn into_fields(self) -> CustomerFields {
        CustomerFields {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
        }
    }
}

/// Birth dates travel as `dd-MM-yyyy` ("12-11-1746").
///
/// ISO `yyyy-MM-dd` is accepted on input as well so clients that send the
/// chrono/JSON default are not rejected.
pub mod birth_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let t = raw.trim();
        NaiveDate::parse_from_str(t, FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(t, "%Y-%m-%d"))
            .map_err(|_| format!("invalid birthDate '{t}': expected dd-MM-yyyy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jose() -> Customer {
        Customer {
            id: 1,
            first_name: "Jose".to_string(),
            last_name: "Joaquim".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1746, 11, 12).unwrap(),
        }
    }

    #[test]
    fn birth_date_serializes_day_month_year() {
        let json = serde_json::to_value(jose()).unwrap();
        assert_eq!(json["birthDate"], "12-11-1746");
        assert_eq!(json["firstName"], "Jose");
        assert_eq!(json["lastName"], "Joaquim");
    }

    #[test]
    fn single_digit_day_and_month_are_zero_padded() {
        let mut c = jose();
        c.birth_date = NaiveDate::from_ymd_opt(1756, 1, 1).unwrap();
        let json = serde_json::to_value(c).unwrap();
        assert_eq!(json["birthDate"], "01-01-1756");
    }

    #[test]
    fn fields_accept_both_date_layouts_and_ignore_id() {
        let a: CustomerFields = serde_json::from_str(
            r#"{"id": 99, "firstName": "A", "lastName": "B", "birthDate": "12-11-1746"}"#,
        )
        .unwrap();
        let b: CustomerFields =
            serde_json::from_str(r#"{"firstName": "A", "lastName": "B", "birthDate": "1746-11-12"}"#)
                .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_date_is_rejected() {
        let res: Result<CustomerFields, _> =
            serde_json::from_str(r#"{"firstName": "A", "lastName": "B", "birthDate": "soon"}"#);
        assert!(res.is_err());
    }
}
