//! Client half of the academy admin: typed wrappers over the REST API, and
//! headless controllers for the create/edit pages built on top of them.

pub mod api;
pub mod error;
pub mod form;
pub mod gate;
pub mod select;
pub mod view;

pub use api::{ApiClient, ClientConfig, ListQuery, Page, ResourceClient};
pub use error::ClientError;
pub use form::{FormController, FormMode, FormState, SubmitTicket};
pub use gate::{gate, GateDecision, Session};
pub use select::{RelationSelect, SelectOption};
pub use view::{FieldView, FormView, PageView, Widget};
