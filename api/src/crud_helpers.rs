use std::{collections::HashMap, hash::Hash};

use academy_models::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub relations: Option<String>,
    #[serde(default)]
    pub count: bool,
}

impl ListParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// An ILIKE pattern matching the search text anywhere in the column.
    pub fn search_pattern(&self) -> Option<String> {
        let search = self.search.as_deref()?.trim();
        if search.is_empty() {
            return None;
        }

        let escaped = search
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }

    pub fn include(&self, kind: EntityKind) -> Result<Include, Error> {
        Include::parse(kind, self.relations.as_deref(), self.count)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    pub relations: Option<String>,
    #[serde(default)]
    pub count: bool,
}

impl GetParams {
    pub fn include(&self, kind: EntityKind) -> Result<Include, Error> {
        Include::parse(kind, self.relations.as_deref(), self.count)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total_count: i64) -> Self {
        Page { data, total_count }
    }
}

/// The number of children counted for a parent, zero when it has none.
pub fn count_of<K: Eq + Hash>(counts: &HashMap<K, i64>, id: Option<K>) -> Option<i64> {
    Some(id.and_then(|id| counts.get(&id).copied()).unwrap_or(0))
}

/// Which relations to embed in the returned records.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Include {
    pub relations: Vec<EntityKind>,
    pub count: bool,
}

impl Include {
    pub fn parse(kind: EntityKind, relations: Option<&str>, count: bool) -> Result<Include, Error> {
        let mut include = Include {
            relations: Vec::new(),
            count,
        };

        let names = relations
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty());
        for name in names {
            let relation = EntityKind::from_name(name)
                .filter(|r| kind.has_relation(r.name()))
                .ok_or_else(|| Error::InvalidRelation(kind.name(), name.to_string()))?;
            if !include.relations.contains(&relation) {
                include.relations.push(relation);
            }
        }

        Ok(include)
    }

    pub fn has(&self, relation: EntityKind) -> bool {
        self.relations.contains(&relation)
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty() && !self.count
    }
}

/// Check a request body against the entity's schema, then decode it.
pub fn decode_body<E: Entity>(body: serde_json::Value) -> Result<E, Error> {
    E::schema().decode(body).map_err(Error::Validation)
}

/// List a page of objects, returning the rows and the total count matching the search.
#[macro_export]
macro_rules! list_objects {
    ($conn: expr, $schema: ident, $row: ty, $params: expr $(, search = $search: ident)?) => {{
        use academy_db::$schema::dsl;
        let params = &$params;
        #[allow(unused_mut)]
        let mut query = dsl::$schema
            .select(<$row>::as_select())
            .order(dsl::id)
            .into_boxed();
        #[allow(unused_mut)]
        let mut count_query = dsl::$schema.count().into_boxed();
        $(
            if let Some(pattern) = params.search_pattern() {
                query = query.filter(dsl::$search.ilike(pattern.clone()));
                count_query = count_query.filter(dsl::$search.ilike(pattern));
            }
        )?

        count_query.get_result::<i64>($conn).and_then(|total| {
            query
                .limit(params.limit())
                .offset(params.offset())
                .load::<$row>($conn)
                .map(|rows| (rows, total))
        })
    }};
}

/// Get an object by ID.
#[macro_export]
macro_rules! get_object {
    ($conn: expr, $schema: ident, $row: ty, $id: expr) => {{
        use academy_db::$schema::dsl;
        dsl::$schema
            .find($id)
            .select(<$row>::as_select())
            .first::<$row>($conn)
    }};
}

/// Insert an object
#[macro_export]
macro_rules! create_object {
    ($conn: expr, $schema: ident, $row: ty, $value: expr) => {{
        use academy_db::$schema::dsl;
        diesel::insert_into(dsl::$schema)
            .values(&$value)
            .returning(<$row>::as_select())
            .get_result::<$row>($conn)
    }};
}

/// Write an object
#[macro_export]
macro_rules! write_object {
    ($conn: expr, $schema: ident, $row: ty, $id: expr, $value: expr) => {{
        use academy_db::$schema::dsl;
        diesel::update(dsl::$schema.find($id))
            .set(&$value)
            .returning(<$row>::as_select())
            .get_result::<$row>($conn)
    }};
}

/// Delete an object, returning the number of rows deleted.
#[macro_export]
macro_rules! delete_object {
    ($conn: expr, $schema: ident, $id: expr) => {{
        use academy_db::$schema::dsl;
        diesel::delete(dsl::$schema.find($id)).execute($conn)
    }};
}

/// Load the children of a set of parents, grouped by parent ID.
#[macro_export]
macro_rules! load_children {
    ($conn: expr, $schema: ident, $row: ty, $model: ty, $fk: ident, $ids: expr) => {{
        use academy_db::$schema::dsl;
        dsl::$schema
            .filter(dsl::$fk.eq_any($ids))
            .order(dsl::id)
            .select(<$row>::as_select())
            .load::<$row>($conn)
            .map(|rows| {
                let mut grouped = std::collections::HashMap::<_, Vec<$model>>::new();
                for row in rows {
                    grouped.entry(row.$fk).or_default().push(<$model>::from(row));
                }
                grouped
            })
    }};
}

/// Count the children of a set of parents, keyed by parent ID.
#[macro_export]
macro_rules! count_children {
    ($conn: expr, $schema: ident, $fk: ident: $id_type: ty, $ids: expr) => {{
        use academy_db::$schema::dsl;
        dsl::$schema
            .filter(dsl::$fk.eq_any($ids))
            .group_by(dsl::$fk)
            .select((dsl::$fk, diesel::dsl::count_star()))
            .load::<($id_type, i64)>($conn)
            .map(|counts| counts.into_iter().collect::<std::collections::HashMap<_, _>>())
    }};
}

/// Load parent objects by ID.
#[macro_export]
macro_rules! load_parents {
    ($conn: expr, $schema: ident, $row: ty, $model: ty, $ids: expr) => {{
        use academy_db::$schema::dsl;
        dsl::$schema
            .filter(dsl::id.eq_any($ids))
            .select(<$row>::as_select())
            .load::<$row>($conn)
            .map(|rows| {
                rows.into_iter()
                    .map(|row| (row.id, <$model>::from(row)))
                    .collect::<std::collections::HashMap<_, _>>()
            })
    }};
}
