use serde::Deserialize;

// game clients sometimes send ids as strings, accept both "5" and 5
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "IdRepr")]
pub struct Id(pub i64);

impl TryFrom<IdRepr> for Id {
    type Error = String;

    fn try_from(value: IdRepr) -> Result<Self, Self::Error> {
        match value {
            IdRepr::Int(v) => Ok(Id(v)),
            IdRepr::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(Id(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_from_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_str(r#"[5, "9", " 12 "]"#).unwrap();
        assert_eq!(ids, [Id(5), Id(9), Id(12)]);
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(serde_json::from_str::<Vec<Id>>(r#"[1, "five"]"#).is_err());
        assert!(serde_json::from_str::<Vec<Id>>(r#"[1.5]"#).is_err());
    }
}
