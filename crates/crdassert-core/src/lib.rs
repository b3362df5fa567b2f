//! crdassert - validate Kubernetes custom resources against their CRD schemas
//!
//! Load CRD manifests, then check resource documents against the
//! `openAPIV3Schema` of the matching group/version/kind:
//!
//! - `SchemaRegistry`: one compiled validator per GVK, built from
//!   `apiextensions.k8s.io/v1` or legacy `v1beta1` CRDs
//! - `ResourceAsserter`: looks resources up by GVK and reports violations
//! - `Reporter`: where violations go (a test collector, a closure, a `Vec`)
//!
//! ```ignore
//! use crdassert_core::{Collector, ResourceAsserter};
//!
//! let mut asserter = ResourceAsserter::new();
//! asserter.load_files(["crds/externalsecret.yaml"])?;
//!
//! let mut collector = Collector::new();
//! asserter.check_files(&mut collector, ["examples/externalsecret.yaml"])?;
//! collector.assert_passed();
//! ```

pub mod asserter;
pub mod crd;
pub mod document;
pub mod error;
pub mod gvk;
pub mod openapi;
pub mod registry;
pub mod reporter;
pub mod resource;
pub mod validator;

pub use asserter::{ResourceAsserter, format_report};
pub use crd::{CrdDefinition, CrdDocument, CrdVersion, normalize};
pub use error::{Error, Result};
pub use gvk::GroupVersionKind;
pub use registry::SchemaRegistry;
pub use reporter::{Collector, FnReporter, Reporter};
pub use resource::Resource;
pub use validator::{SchemaValidator, ValidationResult, Violation};
