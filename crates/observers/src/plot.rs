//! A window for viewing recorded simulation output.
//!
//! See [`Chart`] for usage.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::SampleLog;

/// How a [`Chart`] is rendered.
///
/// Construct with [`ShowConfig::new`] and chain builder methods as needed.
///
/// # Example
///
/// ```ignore
/// chart.show(ShowConfig::new().title("Bouncing ball").legend())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowConfig {
    title: Option<String>,
    legend: bool,
    y_label: Option<String>,
}

impl ShowConfig {
    /// Creates a config with no title, no legend and no axis label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Labels each trace with its column label.
    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }

    #[must_use]
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }
}

/// Time series copied out of a [`SampleLog`], ready to be displayed.
///
/// Every column of the log becomes one trace plotted against simulation
/// time. The x axis is always labeled "time".
///
/// # Example
///
/// ```ignore
/// let recorder = Recorder::new().track(ball, "height");
/// sim.add_observer(recorder.clone());
/// sim.run()?;
///
/// Chart::from_log(&recorder.log()).show(ShowConfig::new().legend())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chart {
    traces: Vec<(String, Vec<[f64; 2]>)>,
}

impl Chart {
    #[must_use]
    pub fn from_log(log: &SampleLog) -> Self {
        let traces = log
            .traces()
            .into_iter()
            .map(|(label, points)| (label, points.into_iter().map(|(t, y)| [t, y]).collect()))
            .collect();
        Self { traces }
    }

    /// Keeps only the traces whose label satisfies `keep`.
    #[must_use]
    pub fn filter(mut self, keep: impl Fn(&str) -> bool) -> Self {
        self.traces.retain(|(label, _)| keep(label));
        self
    }

    /// Opens a blocking egui window displaying the traces.
    ///
    /// Blocks until the window is closed by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let title = config.title.clone().unwrap_or_else(|| "skein".to_owned());
        let traces = self.traces;
        eframe::run_native(
            &title,
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(ChartApp { traces, config }))),
        )
    }
}

struct ChartApp {
    traces: Vec<(String, Vec<[f64; 2]>)>,
    config: ShowConfig,
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("skein_chart").x_axis_label("time");
            if self.config.legend {
                plot = plot.legend(Legend::default());
            }
            if let Some(label) = &self.config.y_label {
                plot = plot.y_axis_label(label.clone());
            }
            plot.show(ui, |plot_ui| {
                for (label, points) in &self.traces {
                    let points: PlotPoints = points.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(label));
                }
            });
        });
    }
}
