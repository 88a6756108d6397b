use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::schema::role_permissions::*;

/// One `(service, entity, operation)` triple granted to a role. The entity
/// may be `*` to cover every entity of the service.
#[derive(Clone, Debug, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::role_permissions)]
pub struct RolePermission {
    pub role: String,
    pub service: String,
    pub entity: String,
    pub operation: String,
}

pub fn for_role(
    conn: &mut PgConnection,
    role_name: &str,
) -> Result<Vec<RolePermission>, diesel::result::Error> {
    table
        .select(RolePermission::as_select())
        .filter(role.eq(role_name))
        .load(conn)
}

/// Add a grant, doing nothing if the role already has it.
pub fn grant(
    conn: &mut PgConnection,
    permission: &RolePermission,
) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(table)
        .values(permission)
        .on_conflict_do_nothing()
        .execute(conn)
}
