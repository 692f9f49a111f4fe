//! Registration processing for LeadScope.
//!
//! This crate ties together URL selection and page fetching into a website
//! analysis, attaches the profile-analysis placeholder, persists the result,
//! and dispatches registrations to background workers.

pub mod analysis;
pub mod dispatch;
pub mod linkedin;
pub mod output;
pub mod processor;

pub use analysis::{ProgressReporter, SilentProgress, WebsiteAnalyzer};
pub use dispatch::{DispatchReceipt, LocalDispatcher, RegistrationDispatcher};
pub use linkedin::{implementation_plan, linkedin_analysis};
pub use output::OutputWriter;
pub use processor::{ProcessedRegistration, RegistrationProcessor};
