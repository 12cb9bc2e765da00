use mongodb::bson::{Document, doc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Visibility flag stored as the strings `"true"` / `"false"`.
///
/// Older documents were written by a form that posted the checkbox value as
/// text, so reads also accept a real boolean and treat anything that is not
/// `"true"` as off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringFlag(pub bool);

impl StringFlag {
    pub fn on() -> Self {
        StringFlag(true)
    }

    pub fn is_on(&self) -> bool {
        self.0
    }

    pub fn flipped(&self) -> Self {
        StringFlag(!self.0)
    }

    pub fn as_str(&self) -> &'static str {
        if self.0 { "true" } else { "false" }
    }
}

impl From<bool> for StringFlag {
    fn from(value: bool) -> Self {
        StringFlag(value)
    }
}

impl Serialize for StringFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StringFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => StringFlag(b),
            Raw::Text(s) => StringFlag(s.trim().eq_ignore_ascii_case("true")),
        })
    }
}

/// Aggregation expression that is true exactly when `field` reads as on.
///
/// Mirrors the deserializer: booleans and any casing of `"true"` count as
/// on, a missing field falls back to `default_on`.
pub fn is_on_expr(field: &str, default_on: bool) -> Document {
    doc! {
        "$eq": [
            {
                "$toLower": {
                    "$trim": {
                        "input": { "$toString": { "$ifNull": [format!("${}", field), default_on] } }
                    }
                }
            },
            "true",
        ]
    }
}

/// Pipeline value that stores the opposite of what `field` currently reads as.
pub fn toggled_expr(field: &str, default_on: bool) -> Document {
    doc! { "$cond": [is_on_expr(field, default_on), "false", "true"] }
}

/// Query filter for documents whose `field` reads as on.
pub fn on_filter(field: &str, default_on: bool) -> Document {
    doc! { "$expr": is_on_expr(field, default_on) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Holder {
        flag: StringFlag,
    }

    #[test]
    fn serializes_as_text() {
        let json = serde_json::to_string(&Holder { flag: StringFlag(true) }).unwrap();
        assert_eq!(json, r#"{"flag":"true"}"#);
    }

    #[test]
    fn reads_text_and_booleans() {
        let h: Holder = serde_json::from_str(r#"{"flag":"false"}"#).unwrap();
        assert!(!h.flag.is_on());
        let h: Holder = serde_json::from_str(r#"{"flag":true}"#).unwrap();
        assert!(h.flag.is_on());
        let h: Holder = serde_json::from_str(r#"{"flag":"yes"}"#).unwrap();
        assert!(!h.flag.is_on());
    }

    #[test]
    fn database_check_accepts_what_reads_accept() {
        let expr = is_on_expr("isActive", true);
        let eq = expr.get_array("$eq").unwrap();
        assert_eq!(eq[1].as_str(), Some("true"));

        let lowered = eq[0].as_document().unwrap();
        let trimmed = lowered.get_document("$toLower").unwrap();
        let input = trimmed.get_document("$trim").unwrap().get_document("input").unwrap();
        let fallback = input
            .get_document("$toString")
            .unwrap()
            .get_array("$ifNull")
            .unwrap();
        assert_eq!(fallback[0].as_str(), Some("$isActive"));
        assert_eq!(fallback[1].as_bool(), Some(true));

        let h: Holder = serde_json::from_str(r#"{"flag":" TRUE "}"#).unwrap();
        assert!(h.flag.is_on());
    }

    #[test]
    fn toggle_writes_text_from_lenient_check() {
        let expr = toggled_expr("quantumActive", false);
        let cond = expr.get_array("$cond").unwrap();
        assert_eq!(cond[0].as_document(), Some(&is_on_expr("quantumActive", false)));
        assert_eq!(cond[1].as_str(), Some("false"));
        assert_eq!(cond[2].as_str(), Some("true"));
    }

    #[test]
    fn filter_wraps_check_in_expr() {
        let filter = on_filter("isActive", true);
        assert_eq!(filter.get_document("$expr").unwrap(), &is_on_expr("isActive", true));
    }
}
