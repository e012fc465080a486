//! Two-way wiring between a form and a model.
//!
//! A [`FormController`] binds form elements to one model:
//!
//! - **Model → Form**: whenever the model announces a change, its full data
//!   snapshot is bulk-written into the form.
//! - **Form → Model**: whenever the form's proxy reports a change, the changed
//!   field is read back and written into the model. The read and the write
//!   run under the proxy's feedback guard, so the resulting model
//!   notification does not flow back into the form.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use horizon_forms::{FormController, FormModel};
//! use horizon_forms_core::{Element, SharedControlTree};
//! use serde_json::json;
//!
//! let tree = Arc::new(SharedControlTree::new());
//! let form = tree.insert_root(Element::form());
//! let email = tree.append(form, Element::text("email")).unwrap();
//!
//! let model = Arc::new(FormModel::new());
//! let binding = FormController::new(model.clone()).bind(&tree, form).unwrap();
//!
//! model.set("email", "ryan@example.com");
//! assert_eq!(tree.value(email).unwrap().as_deref(), Some("ryan@example.com"));
//!
//! tree.user_input(email, "bob@example.com").unwrap();
//! assert_eq!(model.get("email"), Some(json!("bob@example.com")));
//!
//! binding.unbind();
//! ```

use std::sync::Arc;

use horizon_forms_core::{ChangeEvent, ConnectionId, ControlId, SharedControlTree};

use crate::error::FormResult;
use crate::model::Model;
use crate::proxy::FormProxy;

/// Options for a form binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingConfig {
    /// Stop the native change event once the model has been updated, so it
    /// does not bubble on to named ancestors. Defaults to `true`.
    pub stop_propagation: bool,
    /// Write the model's current data into the form when binding. Defaults
    /// to `false`.
    pub sync_on_bind: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            stop_propagation: true,
            sync_on_bind: false,
        }
    }
}

impl BindingConfig {
    /// Set whether handled change events stop propagating.
    pub fn with_stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = stop;
        self
    }

    /// Set whether the model is written into the form at bind time.
    pub fn with_sync_on_bind(mut self, sync: bool) -> Self {
        self.sync_on_bind = sync;
        self
    }
}

/// Binds forms to a model.
pub struct FormController<M: Model + ?Sized> {
    model: Arc<M>,
    config: BindingConfig,
}

impl<M: Model + ?Sized> FormController<M> {
    /// Create a controller for `model` with the default configuration.
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            config: BindingConfig::default(),
        }
    }

    /// Replace the binding configuration.
    pub fn with_config(mut self, config: BindingConfig) -> Self {
        self.config = config;
        self
    }

    /// The binding configuration.
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// The bound model.
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Bind the form element `root` to the model.
    ///
    /// The binding stays live for as long as the model does, whether or not
    /// the returned [`FormBinding`] is kept. Use [`FormBinding::unbind`] to
    /// tear it down early.
    ///
    /// # Errors
    ///
    /// Fails if a [`FormProxy`] cannot be created over `root`.
    pub fn bind(&self, tree: &Arc<SharedControlTree>, root: ControlId) -> FormResult<FormBinding<M>> {
        let proxy = Arc::new(FormProxy::new(tree.clone(), root)?);

        let model_listener = {
            let proxy = proxy.clone();
            let model = Arc::downgrade(&self.model);
            self.model.changed().connect(move |key: &String| {
                if let Some(model) = model.upgrade() {
                    update_form(&proxy, &*model, key);
                }
            })
        };

        let change_listener = {
            let weak_proxy = Arc::downgrade(&proxy);
            let model = Arc::downgrade(&self.model);
            let config = self.config;
            proxy.on_change(move |event: &ChangeEvent| {
                if let (Some(proxy), Some(model)) = (weak_proxy.upgrade(), model.upgrade()) {
                    update_model(&proxy, &*model, event, &config);
                }
            })
        };

        if self.config.sync_on_bind {
            proxy.set_all(&self.model.data());
        }

        tracing::debug!(
            target: "horizon_forms::controller",
            root = ?root,
            fields = proxy.index().len(),
            sync_on_bind = self.config.sync_on_bind,
            "form bound to model"
        );

        Ok(FormBinding {
            proxy,
            model: self.model.clone(),
            model_listener,
            change_listener,
        })
    }
}

impl<M: Model + ?Sized> std::fmt::Debug for FormController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build a binder for `model`.
///
/// The returned closure binds each form element it is given to `model`,
/// using the default [`BindingConfig`].
///
/// ```
/// use std::sync::Arc;
///
/// use horizon_forms::{FormModel, create_form_controller};
/// use horizon_forms_core::{Element, SharedControlTree};
///
/// let model = Arc::new(FormModel::new());
/// let bind = create_form_controller(model.clone());
///
/// let tree = Arc::new(SharedControlTree::new());
/// let form = tree.insert_root(Element::form());
/// let name = tree.append(form, Element::text("name")).unwrap();
/// let _binding = bind(&tree, form).unwrap();
///
/// model.set("name", "Ryan");
/// assert_eq!(tree.value(name).unwrap().as_deref(), Some("Ryan"));
/// ```
pub fn create_form_controller<M: Model + ?Sized>(
    model: Arc<M>,
) -> impl Fn(&Arc<SharedControlTree>, ControlId) -> FormResult<FormBinding<M>> {
    let controller = FormController::new(model);
    move |tree: &Arc<SharedControlTree>, root: ControlId| controller.bind(tree, root)
}

/// A live form-to-model binding.
#[must_use = "dropping a binding leaves it live; call `unbind` to tear it down"]
pub struct FormBinding<M: Model + ?Sized> {
    proxy: Arc<FormProxy>,
    model: Arc<M>,
    model_listener: ConnectionId,
    change_listener: ConnectionId,
}

impl<M: Model + ?Sized> FormBinding<M> {
    /// The proxy over the bound form.
    pub fn proxy(&self) -> &Arc<FormProxy> {
        &self.proxy
    }

    /// The bound model.
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Disconnect both directions and detach the proxy from its controls.
    pub fn unbind(self) {
        self.model.changed().disconnect(self.model_listener);
        self.proxy.change_signal().disconnect(self.change_listener);
        self.proxy.detach();
        tracing::debug!(target: "horizon_forms::controller", root = ?self.proxy.root(), "form unbound");
    }
}

impl<M: Model + ?Sized> std::fmt::Debug for FormBinding<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormBinding")
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

/// Model → Form.
fn update_form<M: Model + ?Sized>(proxy: &FormProxy, model: &M, key: &str) {
    tracing::trace!(target: "horizon_forms::controller", key, "model changed, updating form");
    proxy.set_all(&model.data());
}

/// Form → Model.
fn update_model<M: Model + ?Sized>(
    proxy: &FormProxy,
    model: &M,
    event: &ChangeEvent,
    config: &BindingConfig,
) {
    if config.stop_propagation {
        event.stop_propagation();
    }

    let field = event.target_name();
    proxy.debounce(|done| {
        match proxy.get(field) {
            Ok(value) => {
                tracing::trace!(target: "horizon_forms::controller", field, value = %value, "form changed, updating model");
                model.set(field, value);
            }
            Err(error) => {
                tracing::error!(target: "horizon_forms::controller", field, %error, "cannot read changed field");
            }
        }
        done.release();
    });
}
