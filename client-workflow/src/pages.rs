//! The two top-level screens. They only arrange components and route events between them.

use crate::{
    config::ClientConfig,
    history_table::HistoryView,
    result_view::render_result,
    upload_form::{UploadEvent, UploadForm, ValidationError},
};
use detection_api_caller::{json::detection::DetectionResult, traits::DetectionApi};
use std::{
    fmt::{self, Display},
    sync::Arc,
};
use utils::struct_name;

const STRUCT_NAME: &str = struct_name!(UploadPage);

const UPLOAD_TITLE: &str = "Person Detection";
const HISTORY_TITLE: &str = "Detection History";
const PROCESSING_MESSAGE: &str = "Processing image...";

/// The display next to the upload form
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultPanel {
    #[default]
    Empty,
    Processing,
    Showing(DetectionResult),
}

#[must_use]
pub struct UploadPage {
    config: Arc<ClientConfig>,
    form: UploadForm,
    panel: ResultPanel,
}

impl UploadPage {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            config,
            form: UploadForm::new(),
            panel: ResultPanel::Empty,
        }
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    #[must_use]
    pub fn panel(&self) -> &ResultPanel {
        &self.panel
    }

    pub fn handle_event(&mut self, event: UploadEvent) {
        tracing::trace!("{STRUCT_NAME}: received upload event {event:?}");

        self.panel = match event {
            UploadEvent::Started => ResultPanel::Processing,
            UploadEvent::Succeeded(result) => ResultPanel::Showing(result),
            // The form shows the message inline
            UploadEvent::Failed(_) => ResultPanel::Empty,
        };
    }

    /// Submits the form and routes every event it emits to the result panel
    pub async fn upload(&mut self, api: &dyn DetectionApi) -> Result<(), ValidationError> {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

        let submitted = self.form.submit(api, &sender).await;
        drop(sender);

        while let Some(event) = receiver.recv().await {
            self.handle_event(event);
        }

        submitted
    }

    #[must_use]
    pub fn render(&self) -> String {
        let panel = match &self.panel {
            ResultPanel::Empty => None,
            ResultPanel::Processing => Some(PROCESSING_MESSAGE.to_string()),
            ResultPanel::Showing(result) => render_result(&self.config, Some(result)),
        };

        let mut sections = vec![UPLOAD_TITLE.to_string(), self.form.render()];
        sections.extend(panel);
        sections.join("\n\n")
    }
}

/// The history screen: a title above the history table
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryScreen {
    pub view: HistoryView,
}

impl HistoryScreen {
    pub fn new(view: HistoryView) -> Self {
        Self { view }
    }
}

impl Display for HistoryScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HISTORY_TITLE}")?;
        writeln!(f)?;
        write!(f, "{}", self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_detection;
    use detection_api_caller::{error::RequestError, image_file::ImageFile};
    use mocks::detection_api::make_detection_client_mock;
    use rstest::{fixture, rstest};
    use test_utils::asserts::{assert_has_line, assert_str_contains, assert_str_not_contains};

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[fixture]
    fn page() -> UploadPage {
        let mut page = UploadPage::new(Arc::new(ClientConfig::resolve(|_| None)));
        page.form_mut()
            .select_file(ImageFile::from_bytes("crowd.jpg", JPEG_MAGIC.to_vec()).unwrap());
        page
    }

    #[rstest]
    fn started_clears_the_previous_result(mut page: UploadPage) {
        page.handle_event(UploadEvent::Succeeded(make_detection(1, 3)));
        assert!(matches!(page.panel(), ResultPanel::Showing(_)));

        page.handle_event(UploadEvent::Started);
        assert_eq!(page.panel(), &ResultPanel::Processing);
        assert_has_line(&page.render(), PROCESSING_MESSAGE);
        assert_str_not_contains(&page.render(), "3 people detected");
    }

    #[rstest]
    #[tokio::test]
    async fn successful_upload_shows_result(mut page: UploadPage) {
        let mut api = make_detection_client_mock();
        api.expect_upload_image()
            .times(1)
            .returning(|_, _| Ok(make_detection(42, 1)));

        page.upload(&api).await.unwrap();

        assert_eq!(page.panel(), &ResultPanel::Showing(make_detection(42, 1)));
        assert!(!page.form().is_submitting());

        let rendered = page.render();
        assert_has_line(&rendered, UPLOAD_TITLE);
        assert_has_line(&rendered, "1 person detected");
        assert_has_line(&rendered, "http://localhost/api/results/42.jpg");
        assert_str_contains(&rendered, "[Detect People]");
    }

    #[rstest]
    #[tokio::test]
    async fn failed_upload_releases_busy_state(mut page: UploadPage) {
        let mut api = make_detection_client_mock();
        api.expect_upload_image()
            .times(1)
            .returning(|_, _| Err(RequestError::new("Failed to upload image")));

        page.handle_event(UploadEvent::Succeeded(make_detection(1, 1)));
        page.upload(&api).await.unwrap();

        assert_eq!(page.panel(), &ResultPanel::Empty);
        assert!(!page.form().is_submitting());

        let rendered = page.render();
        assert_str_contains(&rendered, "Error: Failed to upload image");
        assert_str_not_contains(&rendered, PROCESSING_MESSAGE);
        assert_str_not_contains(&rendered, "Detection Results");
    }

    #[tokio::test]
    async fn nothing_selected_keeps_panel() {
        let api = make_detection_client_mock();
        let mut page = UploadPage::new(Arc::new(ClientConfig::resolve(|_| None)));

        assert_eq!(
            page.upload(&api).await,
            Err(ValidationError::NoFileSelected)
        );
        assert_eq!(page.panel(), &ResultPanel::Empty);
    }

    #[test]
    fn history_screen() {
        let rendered = HistoryScreen::new(HistoryView::Empty).to_string();
        assert_has_line(&rendered, HISTORY_TITLE);
        assert_has_line(&rendered, "No detection history found.");

        let rendered = HistoryScreen::new(HistoryView::Loading).to_string();
        assert_has_line(&rendered, "Loading history...");
    }
}
