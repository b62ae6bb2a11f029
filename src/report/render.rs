//! Hand-off of a finished plan to a rendering collaborator

use crate::error::{ReportError, ReportResult};
use crate::report::ReportPlan;
use std::fmt::Display;

/// Something that turns a report plan into a document (PDF, HTML, ...)
pub trait PageRenderer {
    type Error: Display;

    fn render(&mut self, plan: &ReportPlan) -> Result<Vec<u8>, Self::Error>;
}

/// Renders the plan as JSON, for front ends that draw the pages themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl PageRenderer for JsonRenderer {
    type Error = serde_json::Error;

    fn render(&mut self, plan: &ReportPlan) -> Result<Vec<u8>, Self::Error> {
        if self.pretty {
            serde_json::to_vec_pretty(plan)
        } else {
            serde_json::to_vec(plan)
        }
    }
}

/// Render `plan`, wrapping renderer failures into [`ReportError::Render`]
pub fn export<R: PageRenderer>(plan: &ReportPlan, renderer: &mut R) -> ReportResult<Vec<u8>> {
    match renderer.render(plan) {
        Ok(bytes) => {
            log::info!(
                "exported {:?}: {} pages, {} bytes",
                plan.file_name,
                plan.pages.len(),
                bytes.len()
            );
            Ok(bytes)
        }
        Err(e) => {
            log::error!("export of {:?} failed: {}", plan.file_name, e);
            Err(ReportError::render(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::report::{assemble, ReportInput, ReportOptions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingRenderer;

    impl PageRenderer for FailingRenderer {
        type Error = String;

        fn render(&mut self, _plan: &ReportPlan) -> Result<Vec<u8>, Self::Error> {
            Err("printer on fire".to_string())
        }
    }

    fn plan() -> ReportPlan {
        assemble(
            &ReportInput::default(),
            &ReportOptions::default(),
            &ReportConfig::default(),
            &mut StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_json_export() {
        let plan = plan();
        let bytes = export(&plan, &mut JsonRenderer::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["title"], plan.title.as_str());
        assert_eq!(value["layoutMode"], "singlePage");
    }

    #[test]
    fn test_render_failure_wrapped() {
        let err = export(&plan(), &mut FailingRenderer).unwrap_err();
        assert!(matches!(err, ReportError::Render(ref msg) if msg == "printer on fire"));
    }
}
