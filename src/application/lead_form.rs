// Lead form controller - validation and the submit state machine
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::lead::{LeadField, LeadFormValues, LeadReceipt, PropertyLead, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Submitted { lead_id: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Transient message shown after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notice {
    fn success() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Lead submitted successfully!",
            description: "Thank you for your interest. We'll contact you soon.",
        }
    }

    fn failure() -> Self {
        Self {
            kind: NoticeKind::Failure,
            title: "Submission failed",
            description: "Please try again later.",
        }
    }
}

#[derive(Debug, Error)]
pub enum LeadSubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("a submission is already in progress")]
    NotEditing,
    #[error("no submission is in progress")]
    NotSubmitting,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("lead was rejected by the server")]
    Rejected,
}

type SuccessCallback = Box<dyn FnMut(&str) + Send>;

/// Rolls a form back to `Editing` if its submission future is dropped
/// before the response is applied.
struct InFlight<'a> {
    form: &'a mut LeadFormController,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.form.cancel_submit();
    }
}

pub struct LeadFormController {
    values: LeadFormValues,
    phase: FormPhase,
    errors: Option<ValidationErrors>,
    notice: Option<Notice>,
    on_success: Option<SuccessCallback>,
}

impl Default for LeadFormController {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadFormController {
    pub fn new() -> Self {
        Self {
            values: LeadFormValues::default(),
            phase: FormPhase::Editing,
            errors: None,
            notice: None,
            on_success: None,
        }
    }

    /// Called with the server-issued lead id after a successful submission.
    pub fn on_success(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn values(&self) -> &LeadFormValues {
        &self.values
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Edits are accepted only while editing.
    pub fn set_field(&mut self, field: LeadField, value: impl Into<String>) -> bool {
        if self.phase != FormPhase::Editing {
            return false;
        }
        self.values.set(field, value);
        true
    }

    /// Validate and move to `Submitting`. Validation failures stay in
    /// `Editing` with the per-field errors recorded.
    pub fn begin_submit(&mut self) -> Result<PropertyLead, LeadSubmitError> {
        if self.phase != FormPhase::Editing {
            return Err(LeadSubmitError::NotEditing);
        }
        match self.values.validate() {
            Ok(lead) => {
                self.errors = None;
                self.phase = FormPhase::Submitting;
                Ok(lead)
            }
            Err(errors) => {
                self.errors = Some(errors.clone());
                Err(errors.into())
            }
        }
    }

    /// Apply the server's answer to a submission started by `begin_submit`.
    pub fn finish_submit(
        &mut self,
        result: Result<LeadReceipt, ApiError>,
    ) -> Result<Option<String>, LeadSubmitError> {
        if self.phase != FormPhase::Submitting {
            return Err(LeadSubmitError::NotSubmitting);
        }
        let outcome = match result {
            Ok(receipt) if receipt.success => Ok(receipt.lead_id),
            Ok(_) => Err(LeadSubmitError::Rejected),
            Err(e) => Err(LeadSubmitError::Api(e)),
        };

        match outcome {
            Ok(lead_id) => {
                tracing::info!(lead_id = ?lead_id, "Lead submitted");
                self.values = LeadFormValues::default();
                self.notice = Some(Notice::success());
                if let (Some(id), Some(callback)) = (lead_id.as_deref(), self.on_success.as_mut()) {
                    callback(id);
                }
                self.phase = FormPhase::Submitted {
                    lead_id: lead_id.clone(),
                };
                Ok(lead_id)
            }
            Err(e) => {
                tracing::error!("Lead submission error: {}", e);
                self.notice = Some(Notice::failure());
                self.phase = FormPhase::Editing;
                Err(e)
            }
        }
    }

    /// Abandon an in-flight submission: back to `Editing` with the input
    /// kept and a failure notice. Returns false when nothing was in flight.
    pub fn cancel_submit(&mut self) -> bool {
        if self.phase != FormPhase::Submitting {
            return false;
        }
        tracing::warn!("Lead submission cancelled before a response arrived");
        self.notice = Some(Notice::failure());
        self.phase = FormPhase::Editing;
        true
    }

    /// Validate, send once, and apply the result. Dropping the returned
    /// future mid-request leaves the form as `cancel_submit` does.
    pub async fn submit(&mut self, api: &dyn DashboardApi) -> Result<Option<String>, LeadSubmitError> {
        let lead = self.begin_submit()?;
        let guard = InFlight { form: self };
        let result = api.submit_lead(&lead).await;
        guard.form.finish_submit(result)
    }

    /// Leave the thank-you state for a blank form.
    pub fn submit_another(&mut self) {
        if matches!(self.phase, FormPhase::Submitted { .. }) {
            self.values = LeadFormValues::default();
            self.errors = None;
            self.notice = None;
            self.phase = FormPhase::Editing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeApi;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn fill(form: &mut LeadFormController) {
        form.set_field(LeadField::Name, "Al");
        form.set_field(LeadField::Phone, "5551234567");
        form.set_field(LeadField::Email, "a@b.com");
        form.set_field(LeadField::PropertyArea, "Downtown");
        form.set_field(LeadField::PropertyType, "House");
    }

    #[tokio::test]
    async fn test_successful_submit_clears_fields_and_reports_id() {
        let api = FakeApi::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut form = LeadFormController::new().on_success(move |id| sink.lock().unwrap().push(id.to_string()));
        fill(&mut form);

        let lead_id = form.submit(&api).await.unwrap();
        assert_eq!(lead_id.as_deref(), Some("lead_123"));
        assert_eq!(
            form.phase(),
            &FormPhase::Submitted {
                lead_id: Some("lead_123".to_string())
            }
        );
        assert!(form.values().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["lead_123".to_string()]);
        assert_eq!(form.take_notice().map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(form.take_notice(), None);
        assert_eq!(api.submissions()[0].name, "Al");
    }

    #[tokio::test]
    async fn test_invalid_email_blocks_network_call() {
        let api = FakeApi::default();
        let mut form = LeadFormController::new();
        fill(&mut form);
        form.set_field(LeadField::Email, "not-an-email");

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, LeadSubmitError::Invalid(_)));
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(
            form.errors().and_then(|e| e.message_for(LeadField::Email)),
            Some("Please enter a valid email address")
        );
        assert!(api.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_values() {
        let api = FakeApi::default();
        api.respond_to_submit(Err(ApiError::network("/leads", "connection refused")));
        let mut form = LeadFormController::new();
        fill(&mut form);
        form.set_field(LeadField::Message, "Call after 5pm");
        let before = form.values().clone();

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, LeadSubmitError::Api(_)));
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.values(), &before);
        let notice = form.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.title, "Submission failed");
    }

    #[tokio::test]
    async fn test_rejected_receipt_is_a_failure() {
        let api = FakeApi::default();
        api.respond_to_submit(Ok(LeadReceipt {
            success: false,
            lead_id: None,
        }));
        let mut form = LeadFormController::new();
        fill(&mut form);

        let err = form.submit(&api).await.unwrap_err();
        assert!(matches!(err, LeadSubmitError::Rejected));
        assert!(!form.values().is_empty());
    }

    #[tokio::test]
    async fn test_success_without_id_skips_callback() {
        let api = FakeApi::default();
        api.respond_to_submit(Ok(LeadReceipt {
            success: true,
            lead_id: None,
        }));
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let mut form = LeadFormController::new().on_success(move |_| *flag.lock().unwrap() = true);
        fill(&mut form);

        assert_eq!(form.submit(&api).await.unwrap(), None);
        assert!(!*called.lock().unwrap());
        assert_eq!(form.phase(), &FormPhase::Submitted { lead_id: None });
    }

    #[test]
    fn test_submitting_blocks_edits_and_resubmits() {
        let mut form = LeadFormController::new();
        fill(&mut form);
        form.begin_submit().unwrap();

        assert_eq!(form.phase(), &FormPhase::Submitting);
        assert!(!form.set_field(LeadField::Name, "Bob"));
        assert!(matches!(form.begin_submit(), Err(LeadSubmitError::NotEditing)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_returns_to_editing() {
        let api = FakeApi::with_latency(Duration::from_secs(5));
        let mut form = LeadFormController::new();
        fill(&mut form);
        let before = form.values().clone();

        let result = tokio::time::timeout(Duration::from_secs(1), form.submit(&api)).await;
        assert!(result.is_err());

        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.values(), &before);
        assert_eq!(form.take_notice().map(|n| n.kind), Some(NoticeKind::Failure));
        assert!(api.submissions().is_empty());

        assert!(form.set_field(LeadField::Name, "Alan"));
        let lead_id = form.submit(&api).await.unwrap();
        assert_eq!(lead_id.as_deref(), Some("lead_123"));
        assert_eq!(api.submissions()[0].name, "Alan");
    }

    #[test]
    fn test_cancel_submit_only_from_submitting() {
        let mut form = LeadFormController::new();
        fill(&mut form);
        assert!(!form.cancel_submit());
        assert!(form.take_notice().is_none());

        form.begin_submit().unwrap();
        assert!(form.cancel_submit());
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.values().get(LeadField::Name), "Al");
    }

    #[test]
    fn test_finish_without_begin_is_refused() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let mut form = LeadFormController::new().on_success(move |_| *flag.lock().unwrap() = true);
        fill(&mut form);
        form.set_field(LeadField::Email, "not-an-email");

        let receipt = Ok(LeadReceipt {
            success: true,
            lead_id: Some("x".to_string()),
        });
        assert!(matches!(form.finish_submit(receipt), Err(LeadSubmitError::NotSubmitting)));
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.values().get(LeadField::Email), "not-an-email");
        assert!(form.take_notice().is_none());
        assert!(!*called.lock().unwrap());
    }

    #[tokio::test]
    async fn test_submit_another_returns_fresh_form() {
        let api = FakeApi::default();
        let mut form = LeadFormController::new();
        fill(&mut form);
        form.submit(&api).await.unwrap();

        assert!(!form.set_field(LeadField::Name, "Bob"));
        form.submit_another();
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert!(form.values().is_empty());
        assert!(form.take_notice().is_none());
        assert!(form.set_field(LeadField::Name, "Bob"));
    }
}
