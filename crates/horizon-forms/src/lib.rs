//! Horizon Forms - two-way binding between form controls and models.
//!
//! This crate re-exports the core control tree and signal APIs and adds the
//! binding layer on top:
//!
//! - [`FormProxy`]: name-indexed `get`/`set` over a form's controls, with a
//!   `change` signal fed by user interaction and a feedback guard
//! - [`Model`] and the in-memory [`FormModel`]
//! - [`FormController`] and [`create_form_controller`]: the wiring that keeps
//!   a form and a model in sync without update loops
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_forms::{Element, FormModel, SharedControlTree, create_form_controller};
//! use serde_json::json;
//!
//! let tree = Arc::new(SharedControlTree::new());
//! let form = tree.insert_root(Element::form());
//! let spring = tree.append(form, Element::checkbox("seasons", "spring")).unwrap();
//! tree.append(form, Element::checkbox("seasons", "summer")).unwrap();
//! tree.append(form, Element::radio("size", "s")).unwrap();
//! tree.append(form, Element::radio("size", "m")).unwrap();
//!
//! let model = Arc::new(FormModel::from_value(json!({ "size": "m" })));
//! let bind = create_form_controller(model.clone());
//! let binding = bind(&tree, form).unwrap();
//!
//! // Model to form
//! model.set("seasons", json!(["summer"]));
//! assert_eq!(binding.proxy().get("seasons").unwrap(), json!(["summer"]));
//!
//! // Form to model
//! tree.user_click(spring).unwrap();
//! assert_eq!(model.get("seasons"), Some(json!(["spring", "summer"])));
//! ```

pub use horizon_forms_core::*;

mod accessor;
pub mod controller;
mod error;
pub mod guard;
pub mod index;
pub mod model;
pub mod path;
pub mod proxy;
pub mod value;

pub use controller::{BindingConfig, FormBinding, FormController, create_form_controller};
pub use error::{FormError, FormResult};
pub use guard::{FeedbackGuard, Release};
pub use index::{ControlIndexer, FieldEntry, FieldIndex};
pub use model::{FormModel, Model};
pub use proxy::FormProxy;
