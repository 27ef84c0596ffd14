//! Prediction display rendering
//!
//! One rendering consumer watches the prediction observable and
//! overwrites a display surface with the labelled result. The label
//! prefix is fixed; only the predicted value changes between updates.

use emocam_upload::{AppliedPrediction, Prediction};
use tokio::sync::watch;

/// Label rendered before the predicted value, matching the upstream
/// service's locale.
pub const DISPLAY_LABEL: &str = "予測された感情";

/// Render a prediction into the display line.
pub fn render(prediction: &Prediction) -> String {
    format!("{}: {}", DISPLAY_LABEL, prediction.emotion)
}

/// Sink the rendered line is written to (the display-element seam).
pub trait DisplaySurface: Send {
    /// Overwrite the visible text
    fn set_text(&mut self, text: &str);
}

/// Surface that prints each update as a line on stdout
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl DisplaySurface for ConsoleSurface {
    fn set_text(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Surface that retains the current text (tests)
#[derive(Debug, Default)]
pub struct BufferSurface {
    text: String,
}

impl BufferSurface {
    /// Currently displayed text
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DisplaySurface for BufferSurface {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

/// The single rendering consumer of the prediction observable.
pub struct EmotionDisplay<S: DisplaySurface> {
    results: watch::Receiver<Option<AppliedPrediction>>,
    surface: S,
}

impl<S: DisplaySurface> EmotionDisplay<S> {
    /// Create a display over a session's prediction channel
    pub fn new(results: watch::Receiver<Option<AppliedPrediction>>, surface: S) -> Self {
        Self { results, surface }
    }

    /// Write one prediction to the surface. Applying the same
    /// prediction again yields the same displayed text.
    pub fn apply(&mut self, prediction: &Prediction) {
        self.surface.set_text(&render(prediction));
    }

    /// Drive the surface until the session's result channel closes.
    pub async fn run(mut self) -> S {
        while self.results.changed().await.is_ok() {
            let applied = self.results.borrow_and_update().clone();
            if let Some(applied) = applied {
                self.apply(&applied.prediction);
            }
        }
        self.surface
    }
}
