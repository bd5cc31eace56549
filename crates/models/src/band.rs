use std::cmp::Ordering;

use sea_orm::{
    entity::prelude::*,
    sea_query::{NullOrdering, Order},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QueryTrait, Set,
};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "band")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_year")]
    pub year: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Whole years go out as JSON integers (`2020`, not `2020.0`).
fn serialize_year<S: Serializer>(year: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match year {
        Some(y) if y.fract() == 0.0 && y.abs() < 9.0e15 => s.serialize_i64(*y as i64),
        Some(y) => s.serialize_f64(*y),
        None => s.serialize_none(),
    }
}

/// Listing order: year descending (missing years last), then name ascending
/// by byte value (missing names first).
pub fn listing_order(a: &Model, b: &Model) -> Ordering {
    let by_year = match (a.year, b.year) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_year.then_with(|| a.name.as_deref().map(str::as_bytes).cmp(&b.name.as_deref().map(str::as_bytes)))
}

/// Parse a path identifier into the store's key type.
pub fn parse_id(raw: &str) -> Result<Uuid, ModelError> {
    Uuid::parse_str(raw)
        .map_err(|e| ModelError::InvalidId(format!("cast to id failed for value {raw:?}: {e}")))
}

/// One field of an incoming payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    /// Key absent: leave the stored value alone.
    #[default]
    Keep,
    /// Key present with `null`.
    Clear,
    Set(T),
}

impl<T: Clone> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    fn value(&self) -> Option<T> {
        match self {
            Patch::Set(v) => Some(v.clone()),
            Patch::Keep | Patch::Clear => None,
        }
    }

    fn apply(&self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) => *slot = Some(v.clone()),
        }
    }

    fn active(&self) -> ActiveValue<Option<T>>
    where
        Option<T>: Into<sea_orm::Value>,
    {
        match self {
            Patch::Keep => NotSet,
            Patch::Clear => Set(None),
            Patch::Set(v) => Set(Some(v.clone())),
        }
    }
}

/// A validated partial band. Unknown keys are dropped during validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BandPayload {
    pub name: Patch<String>,
    pub country: Patch<String>,
    pub website: Patch<String>,
    pub facebook: Patch<String>,
    pub instagram: Patch<String>,
    pub day_of_week: Patch<String>,
    pub year: Patch<f64>,
}

impl BandPayload {
    /// Validate a decoded JSON body against the band shape.
    ///
    /// Text fields take strings, and numbers or booleans cast to text. `year`
    /// takes numbers, numeric strings and booleans. `null` clears a field.
    /// Every offending field is reported in one error.
    pub fn from_json(body: &Value) -> Result<Self, ModelError> {
        let obj = match body {
            Value::Object(map) => map,
            other => {
                return Err(ModelError::Validation(format!(
                    "band payload must be a JSON object, got {}",
                    json_type(other)
                )))
            }
        };

        let mut errors = Vec::new();
        let payload = Self {
            name: text_field(obj, "name", &mut errors),
            country: text_field(obj, "country", &mut errors),
            website: text_field(obj, "website", &mut errors),
            facebook: text_field(obj, "facebook", &mut errors),
            instagram: text_field(obj, "instagram", &mut errors),
            day_of_week: text_field(obj, "dayOfWeek", &mut errors),
            year: number_field(obj, "year", &mut errors),
        };

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(ModelError::Validation(errors.join("; ")))
        }
    }

    /// True when no known field was present.
    pub fn is_empty(&self) -> bool {
        self.name.is_keep()
            && self.country.is_keep()
            && self.website.is_keep()
            && self.facebook.is_keep()
            && self.instagram.is_keep()
            && self.day_of_week.is_keep()
            && self.year.is_keep()
    }

    /// Fresh record under `id`; absent and null fields are both left empty.
    pub fn to_model(&self, id: Uuid) -> Model {
        Model {
            id,
            name: self.name.value(),
            country: self.country.value(),
            website: self.website.value(),
            facebook: self.facebook.value(),
            instagram: self.instagram.value(),
            day_of_week: self.day_of_week.value(),
            year: self.year.value(),
        }
    }

    /// Field-level merge onto an existing record.
    pub fn apply_to(&self, model: &mut Model) {
        self.name.apply(&mut model.name);
        self.country.apply(&mut model.country);
        self.website.apply(&mut model.website);
        self.facebook.apply(&mut model.facebook);
        self.instagram.apply(&mut model.instagram);
        self.day_of_week.apply(&mut model.day_of_week);
        self.year.apply(&mut model.year);
    }

    /// Active model carrying only the fields present in the payload.
    pub fn to_update_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: self.name.active(),
            country: self.country.active(),
            website: self.website.active(),
            facebook: self.facebook.active(),
            instagram: self.instagram.active(),
            day_of_week: self.day_of_week.active(),
            year: self.year.active(),
        }
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `1.0` becomes `"1"`, matching how whole years are written out.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Patch<String> {
    match obj.get(key) {
        None => Patch::Keep,
        Some(Value::Null) => Patch::Clear,
        Some(Value::String(s)) => Patch::Set(s.clone()),
        Some(Value::Number(n)) => Patch::Set(number_text(n)),
        Some(Value::Bool(b)) => Patch::Set(b.to_string()),
        Some(other) => {
            errors.push(format!("{key}: cannot cast {other} ({}) to string", json_type(other)));
            Patch::Keep
        }
    }
}

fn number_field(obj: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Patch<f64> {
    match obj.get(key) {
        None => Patch::Keep,
        Some(Value::Null) => Patch::Clear,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => Patch::Set(f),
            _ => {
                errors.push(format!("{key}: {n} is not a representable number"));
                Patch::Keep
            }
        },
        Some(Value::Bool(b)) => Patch::Set(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) if s.trim().is_empty() => Patch::Clear,
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Patch::Set(f),
            _ => {
                errors.push(format!("{key}: cannot cast {s:?} (string) to number"));
                Patch::Keep
            }
        },
        Some(other) => {
            errors.push(format!("{key}: cannot cast {other} ({}) to number", json_type(other)));
            Patch::Keep
        }
    }
}

pub async fn create(db: &DatabaseConnection, payload: &BandPayload) -> Result<Model, ModelError> {
    let m = payload.to_model(Uuid::new_v4());
    let am = ActiveModel {
        id: Set(m.id),
        name: Set(m.name),
        country: Set(m.country),
        website: Set(m.website),
        facebook: Set(m.facebook),
        instagram: Set(m.instagram),
        day_of_week: Set(m.day_of_week),
        year: Set(m.year),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_sorted(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_with_nulls(Column::Year, Order::Desc, NullOrdering::Last)
        .order_by_with_nulls(Column::Name, Order::Asc, NullOrdering::First)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Single `UPDATE ... RETURNING`; `None` when no row matched.
pub async fn update(db: &DatabaseConnection, id: Uuid, payload: &BandPayload) -> Result<Option<Model>, ModelError> {
    // nothing to SET; an empty update still has to report existence
    if payload.is_empty() {
        return find(db, id).await;
    }
    let rows = Entity::update_many()
        .set(payload.to_update_active_model())
        .filter(Column::Id.eq(id))
        .exec_with_returning(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(rows.into_iter().next())
}

/// Single `DELETE ... RETURNING`; `None` when no row matched.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    let mut query = Entity::delete_many().filter(Column::Id.eq(id)).into_query();
    query.returning_all();
    let stmt = db.get_database_backend().build(&query);
    Entity::find()
        .from_raw_sql(stmt)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn band(name: Option<&str>, year: Option<f64>) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: name.map(str::to_string),
            country: None,
            website: None,
            facebook: None,
            instagram: None,
            day_of_week: None,
            year,
        }
    }

    #[test]
    fn payload_drops_unknown_fields() {
        let p = BandPayload::from_json(&json!({"name": "Opeth", "genre": "metal"})).unwrap();
        assert_eq!(p.name, Patch::Set("Opeth".into()));
        let m = p.to_model(Uuid::new_v4());
        let out = serde_json::to_value(&m).unwrap();
        assert!(out.get("genre").is_none());
        assert_eq!(out["name"], "Opeth");
    }

    #[test]
    fn empty_object_is_valid_and_empty() {
        let p = BandPayload::from_json(&json!({})).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn year_casts_numeric_strings_and_rejects_words() {
        let p = BandPayload::from_json(&json!({"year": " 1999 "})).unwrap();
        assert_eq!(p.year, Patch::Set(1999.0));

        let err = BandPayload::from_json(&json!({"year": "last summer"})).unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.contains("year")));
    }

    #[test]
    fn text_fields_cast_scalars_and_reject_structures() {
        let p = BandPayload::from_json(&json!({"name": 311, "country": true})).unwrap();
        assert_eq!(p.name, Patch::Set("311".into()));
        assert_eq!(p.country, Patch::Set("true".into()));

        let err = BandPayload::from_json(&json!({"website": ["a"], "year": {"x": 1}})).unwrap_err();
        match err {
            ModelError::Validation(msg) => {
                assert!(msg.contains("website"));
                assert!(msg.contains("year"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(BandPayload::from_json(&json!([1, 2])).is_err());
        assert!(BandPayload::from_json(&json!("band")).is_err());
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut m = band(Some("Mew"), Some(2003.0));
        m.country = Some("DK".into());
        let p = BandPayload::from_json(&json!({"year": 2025, "country": null})).unwrap();
        p.apply_to(&mut m);
        assert_eq!(m.name.as_deref(), Some("Mew"));
        assert_eq!(m.year, Some(2025.0));
        assert_eq!(m.country, None);
    }

    #[test]
    fn update_active_model_leaves_absent_fields_unset() {
        let p = BandPayload::from_json(&json!({"year": 2025})).unwrap();
        let am = p.to_update_active_model();
        assert!(am.name.is_not_set());
        assert!(am.id.is_not_set());
        assert_eq!(am.year, Set(Some(2025.0)));
    }

    #[test]
    fn whole_years_serialize_as_integers() {
        let m = band(Some("Kent"), Some(1990.0));
        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["year"], json!(1990));
        assert!(out.get("country").is_none());

        let m = band(None, Some(1990.5));
        assert_eq!(serde_json::to_value(&m).unwrap()["year"], json!(1990.5));
    }

    #[test]
    fn day_of_week_uses_camel_case_key() {
        let p = BandPayload::from_json(&json!({"dayOfWeek": "Friday", "day_of_week": "ignored"})).unwrap();
        let out = serde_json::to_value(p.to_model(Uuid::new_v4())).unwrap();
        assert_eq!(out["dayOfWeek"], "Friday");
        assert!(out.get("day_of_week").is_none());
    }

    #[test]
    fn listing_order_is_year_desc_then_name_asc() {
        let mut v = vec![
            band(Some("Zeta"), Some(2020.0)),
            band(Some("B"), Some(2019.0)),
            band(None, None),
            band(Some("Alpha"), Some(2020.0)),
            band(Some("A"), Some(2021.0)),
            band(Some("alpha"), Some(2020.0)),
        ];
        v.sort_by(listing_order);
        let names: Vec<_> = v.iter().map(|b| b.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("A"), Some("Alpha"), Some("Zeta"), Some("alpha"), Some("B"), None]
        );
    }

    #[test]
    fn whole_float_numbers_cast_to_integer_text() {
        let p = BandPayload::from_json(&json!({"name": 1.0, "country": 2.5, "website": 42})).unwrap();
        assert_eq!(p.name, Patch::Set("1".into()));
        assert_eq!(p.country, Patch::Set("2.5".into()));
        assert_eq!(p.website, Patch::Set("42".into()));
    }

    #[test]
    fn parse_id_rejects_malformed_ids() {
        assert!(parse_id("not-an-id").is_err());
        let padded = format!(" {}", Uuid::new_v4());
        assert!(matches!(parse_id(&padded), Err(ModelError::InvalidId(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
