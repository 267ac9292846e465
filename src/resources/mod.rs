//! CRUD endpoints over JSON-file collections.
//!
//! A [`Resource`] names a collection and lists its fields together with
//! the rule deciding whether a request value is accepted for that field.
//! [`mount`] registers the six standard routes for it:
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/things` | every record |
//! | GET | `/things/:id` | one record or 404 |
//! | POST | `/things` | create, `201` |
//! | PUT | `/things/:id` | replace field by field |
//! | PATCH | `/things/:id` | shallow merge |
//! | DELETE | `/things/:id` | remove |
//!
//! `:id` is compared numerically against each record's `id`.

pub mod artists;
pub mod shows;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use http::StatusCode;
use serde_json::{Map, Value, json};

use crate::app::App;
use crate::context::Context;
use crate::error::Error;
use crate::handler::{BoxFuture, Handler};
use crate::store::{JsonStore, Record};

/// Which request values a field accepts.
#[derive(Clone, Copy, Debug)]
pub enum Accept {
    /// Anything but `null`, `false`, `0` and `""`.
    Truthy,
    Bool,
    Number,
    Array,
}

/// Value used when a request does not supply an accepted one on create.
#[derive(Clone, Copy, Debug)]
pub enum Fallback {
    Text(&'static str),
    Bool(bool),
    Number(i64),
    EmptyArray,
    /// The current time, RFC 3339 with milliseconds, UTC.
    Now,
}

impl Fallback {
    fn value(self) -> Value {
        match self {
            Self::Text(s) => Value::from(s),
            Self::Bool(b) => Value::from(b),
            Self::Number(n) => Value::from(n),
            Self::EmptyArray => Value::Array(Vec::new()),
            Self::Now => Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub key: &'static str,
    pub accept: Accept,
    pub fallback: Fallback,
}

/// A collection exposed over HTTP.
#[derive(Debug)]
pub struct Resource {
    /// Singular display name, used in response messages.
    pub name: &'static str,
    /// Route prefix, e.g. `/artists`.
    pub path: &'static str,
    /// Collection file name in the store.
    pub collection: &'static str,
    pub fields: &'static [Field],
}

impl Resource {
    fn not_found(&self) -> Value {
        json!({ "error": format!("{} not found", self.name) })
    }

    /// A new record: `id` first, then each field from `body` or its fallback.
    fn create(&self, id: i64, body: &Value) -> Record {
        let mut record = Map::new();
        record.insert("id".to_owned(), Value::from(id));
        for field in self.fields {
            let value = accepted(field, body).unwrap_or_else(|| field.fallback.value());
            record.insert(field.key.to_owned(), value);
        }
        Value::Object(record)
    }

    /// A replacement record. Fields the body does not supply keep the
    /// existing value; fields absent from both are left out.
    fn replace(&self, id: Value, body: &Value, existing: &Record) -> Record {
        let mut record = Map::new();
        record.insert("id".to_owned(), id);
        for field in self.fields {
            let value = accepted(field, body).or_else(|| existing.get(field.key).cloned());
            if let Some(value) = value {
                record.insert(field.key.to_owned(), value);
            }
        }
        Value::Object(record)
    }
}

fn accepted(field: &Field, body: &Value) -> Option<Value> {
    let value = body.get(field.key)?;
    let ok = match field.accept {
        Accept::Truthy => is_truthy(value),
        Accept::Bool => value.is_boolean(),
        Accept::Number => value.is_number(),
        Accept::Array => value.is_array(),
    };
    ok.then(|| value.clone())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric form of an `:id` parameter. `None` never matches a record.
///
/// Accepts decimal and exponent forms as well as unsigned `0x`, `0o` and
/// `0b` integers.
fn parse_id(param: Option<&str>) -> Option<f64> {
    let text = param?.trim();
    let radix = match text.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return text.parse::<f64>().ok().filter(|f| f.is_finite()),
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| Some(acc * f64::from(radix) + f64::from(c.to_digit(radix)?)))
        .filter(|f| f.is_finite())
}

fn has_id(record: &Record, id: f64) -> bool {
    record.get("id").and_then(Value::as_f64) == Some(id)
}

fn next_id(records: &[Record]) -> Result<i64, Error> {
    match records.iter().filter_map(|r| r.get("id")?.as_i64()).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| Error::handler("record ids exhausted")),
    }
}

// ── Endpoints ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Action {
    List,
    Fetch,
    Create,
    Replace,
    Merge,
    Remove,
}

struct Endpoint {
    resource: &'static Resource,
    store: Arc<JsonStore>,
    action: Action,
}

impl Handler for Endpoint {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            match self.action {
                Action::List => self.list(ctx).await,
                Action::Fetch => self.fetch(ctx).await,
                Action::Create => self.create(ctx).await,
                Action::Replace => self.replace(ctx).await,
                Action::Merge => self.merge(ctx).await,
                Action::Remove => self.remove(ctx).await,
            }
        })
    }
}

impl Endpoint {
    async fn list(&self, ctx: &mut Context) -> Result<(), Error> {
        let records = self.store.read_collection(self.resource.collection).await;
        ctx.json(&records)
    }

    async fn fetch(&self, ctx: &mut Context) -> Result<(), Error> {
        let id = parse_id(ctx.param("id"));
        let records = self.store.read_collection(self.resource.collection).await;
        match id.and_then(|id| records.iter().find(|r| has_id(r, id))) {
            Some(record) => ctx.json(record),
            None => ctx.status(StatusCode::NOT_FOUND).json(&self.resource.not_found()),
        }
    }

    async fn create(&self, ctx: &mut Context) -> Result<(), Error> {
        let mut records = self.store.read_collection(self.resource.collection).await;
        let record = self.resource.create(next_id(&records)?, ctx.body());
        records.push(record.clone());
        self.store.write_collection(self.resource.collection, &records).await?;
        ctx.status(StatusCode::CREATED).json(&record)
    }

    async fn replace(&self, ctx: &mut Context) -> Result<(), Error> {
        let id = parse_id(ctx.param("id"));
        let mut records = self.store.read_collection(self.resource.collection).await;
        let Some(index) = id.and_then(|id| records.iter().position(|r| has_id(r, id))) else {
            return ctx.status(StatusCode::NOT_FOUND).json(&self.resource.not_found());
        };

        let existing = &records[index];
        let record_id = existing.get("id").cloned().unwrap_or(Value::Null);
        let updated = self.resource.replace(record_id, ctx.body(), existing);
        records[index] = updated.clone();
        self.store.write_collection(self.resource.collection, &records).await?;
        ctx.json(&updated)
    }

    async fn merge(&self, ctx: &mut Context) -> Result<(), Error> {
        let id = parse_id(ctx.param("id"));
        let mut records = self.store.read_collection(self.resource.collection).await;
        let Some(index) = id.and_then(|id| records.iter().position(|r| has_id(r, id))) else {
            return ctx.status(StatusCode::NOT_FOUND).json(&self.resource.not_found());
        };

        let mut updated = records[index].clone();
        if let (Some(target), Some(patch)) = (updated.as_object_mut(), ctx.body().as_object()) {
            let id = target.get("id").cloned();
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
            if let Some(id) = id {
                target.insert("id".to_owned(), id);
            }
        }
        records[index] = updated.clone();
        self.store.write_collection(self.resource.collection, &records).await?;
        ctx.json(&updated)
    }

    async fn remove(&self, ctx: &mut Context) -> Result<(), Error> {
        let id = parse_id(ctx.param("id"));
        let mut records = self.store.read_collection(self.resource.collection).await;
        let before = records.len();
        if let Some(id) = id {
            records.retain(|r| !has_id(r, id));
        }

        if records.len() < before {
            self.store.write_collection(self.resource.collection, &records).await?;
            ctx.json(&json!({ "message": format!("{} deleted", self.resource.name) }))
        } else {
            ctx.status(StatusCode::NOT_FOUND).json(&self.resource.not_found())
        }
    }
}

/// Registers the six CRUD routes for `resource` on `app`.
pub fn mount(app: &mut App, store: &Arc<JsonStore>, resource: &'static Resource) -> Result<(), Error> {
    let endpoint = |action| Endpoint { resource, store: Arc::clone(store), action };
    let item = format!("{}/:id", resource.path);

    app.get(resource.path, endpoint(Action::List))?
        .get(&item, endpoint(Action::Fetch))?
        .post(resource.path, endpoint(Action::Create))?
        .put(&item, endpoint(Action::Replace))?
        .patch(&item, endpoint(Action::Merge))?
        .delete(&item, endpoint(Action::Remove))?;
    Ok(())
}
