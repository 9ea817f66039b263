//! Application state: the per-frame pipeline and the keyboard controls.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::audio::AudioSource;
use crate::colors::ColorScheme;
use crate::dsp::Processor;
use crate::params::{AudioConfig, Config, MAX_BAR_WIDTH, MAX_SENSITIVITY, MIN_SENSITIVITY};
use crate::render::Surface;
use crate::ui;
use crate::visualizer::{Effect, Frame, Style, Visualizer};

/// How long a notification stays on screen
pub const NOTIFICATION_TIME: Duration = Duration::from_secs(5);

const SENSITIVITY_STEP: f32 = 1.15;
const SMOOTHING_STEP: f32 = 0.1;
const SMOOTHING_MAX: f32 = 0.95;
const SMOOTHING_WRAP: f32 = 0.1;

/// A user command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Close the help box, or quit when it is not shown
    Back,
    SelectStyle(Style),
    NextStyle,
    NextScheme,
    PrevScheme,
    SensitivityUp,
    SensitivityDown,
    ToggleMirror,
    TogglePeaks,
    CycleSmoothing,
    NarrowerBars,
    WiderBars,
    ToggleHelp,
}

impl Action {
    /// Map a key press; releases and repeats are ignored
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Action::Quit);
        }

        let action = match key.code {
            KeyCode::Esc => Action::Back,
            KeyCode::Char(c) => match c {
                'q' | 'Q' => Action::Quit,
                '1'..='5' => {
                    let idx = c as usize - '1' as usize;
                    Action::SelectStyle(Style::ALL[idx])
                }
                'n' | 'N' => Action::NextStyle,
                'c' => Action::NextScheme,
                'C' => Action::PrevScheme,
                '+' | '=' => Action::SensitivityUp,
                '-' | '_' => Action::SensitivityDown,
                'm' | 'M' => Action::ToggleMirror,
                'p' | 'P' => Action::TogglePeaks,
                's' | 'S' => Action::CycleSmoothing,
                '[' => Action::NarrowerBars,
                ']' => Action::WiderBars,
                '?' | 'h' | 'H' => Action::ToggleHelp,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }
}

struct Notification {
    message: String,
    expires: Instant,
}

/// Everything the frame loop needs
pub struct App {
    config: Config,
    processor: Processor,
    visualizer: Visualizer,
    scheme: ColorScheme,
    source: Box<dyn AudioSource>,
    rng: StdRng,
    show_help: bool,
    notification: Option<Notification>,
    running: bool,
}

impl App {
    /// `fallback` is shown as a notification when live capture was replaced
    pub fn new(
        mut config: Config,
        source: Box<dyn AudioSource>,
        fallback: Option<String>,
        seed: u64,
    ) -> Self {
        let scheme = ColorScheme::by_name(&config.color_scheme).unwrap_or_else(|e| {
            warn!("{}, using {}", e, ColorScheme::default());
            ColorScheme::default()
        });
        config.color_scheme = scheme.name().to_string();
        config.demo_mode = source.label() == crate::audio::DemoAudio::LABEL;

        // Bin frequencies must follow the rate the source actually delivers
        let audio = AudioConfig {
            sample_rate_hz: source.sample_rate(),
            ..config.audio.clone()
        };
        info!(
            style = config.style.name(),
            scheme = scheme.name(),
            source = source.label(),
            seed,
            "starting visualizer"
        );

        Self {
            processor: Processor::new(audio),
            visualizer: Visualizer::new(config.style),
            scheme,
            source,
            rng: StdRng::seed_from_u64(seed),
            show_help: false,
            notification: fallback.map(|message| Notification {
                message,
                expires: Instant::now() + NOTIFICATION_TIME,
            }),
            running: true,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn style(&self) -> Style {
        self.visualizer.style()
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    /// Time between frames at the configured rate
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.visual.fps.max(1) as f64)
    }

    /// React to a terminal event; resizes are handled by the surface
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if let Some(action) = Action::from_key(*key) {
                self.apply(action);
            }
        }
    }

    pub fn apply(&mut self, action: Action) {
        let visual = &mut self.config.visual;
        match action {
            Action::Quit => self.running = false,
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.running = false;
                }
            }
            Action::SelectStyle(style) => self.set_visualizer(Visualizer::new(style)),
            Action::NextStyle => {
                let next = self.visualizer.next();
                self.set_visualizer(next);
            }
            Action::NextScheme => self.set_scheme(self.scheme.next()),
            Action::PrevScheme => self.set_scheme(self.scheme.prev()),
            Action::SensitivityUp => {
                visual.sensitivity = (visual.sensitivity * SENSITIVITY_STEP).min(MAX_SENSITIVITY);
            }
            Action::SensitivityDown => {
                visual.sensitivity = (visual.sensitivity / SENSITIVITY_STEP).max(MIN_SENSITIVITY);
            }
            Action::ToggleMirror => visual.mirror = !visual.mirror,
            Action::TogglePeaks => visual.show_peaks = !visual.show_peaks,
            Action::CycleSmoothing => {
                visual.smoothing += SMOOTHING_STEP;
                if visual.smoothing > SMOOTHING_MAX {
                    visual.smoothing = SMOOTHING_WRAP;
                }
            }
            Action::NarrowerBars => visual.bar_width = visual.bar_width.saturating_sub(1).max(1),
            Action::WiderBars => visual.bar_width = (visual.bar_width + 1).min(MAX_BAR_WIDTH),
            Action::ToggleHelp => self.show_help = !self.show_help,
        }
    }

    /// Read audio, analyze it and draw one frame with overlays.
    ///
    /// Returns `false` when the surface is too small to draw on.
    pub fn render_frame(&mut self, surface: &mut dyn Surface) -> bool {
        let samples = self.source.read();
        let (width, height) = surface.size();
        if width < 2 || height < 2 {
            return false;
        }

        let visual = &self.config.visual;
        let band_count = self.visualizer.band_count(width, visual);
        let spectrum = self.processor.process(&samples, band_count, visual);

        surface.clear();
        let frame = Frame {
            spectrum: &spectrum,
            samples: &samples,
            width,
            height,
            scheme: &self.scheme,
            config: visual,
        };
        self.visualizer.draw(&frame, surface, &mut self.rng);

        if visual.show_status {
            let status = ui::status_line(
                self.source.label(),
                self.visualizer.style(),
                self.scheme.name(),
                visual,
            );
            ui::draw_status_bar(surface, &status);
        }
        if self.show_help {
            ui::draw_help(surface);
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|note| Instant::now() >= note.expires)
        {
            self.notification = None;
        }
        if let Some(note) = &self.notification {
            ui::draw_notification(surface, &note.message, ui::NOTICE);
        }
        true
    }

    /// Release the audio source
    pub fn close(&mut self) {
        self.source.close();
    }

    fn set_visualizer(&mut self, visualizer: Visualizer) {
        debug!(from = self.visualizer.name(), to = visualizer.name(), "switching style");
        self.config.style = visualizer.style();
        self.visualizer = visualizer;
    }

    fn set_scheme(&mut self, scheme: ColorScheme) {
        debug!(from = self.scheme.name(), to = scheme.name(), "switching color scheme");
        self.config.color_scheme = scheme.name().to_string();
        self.scheme = scheme;
    }
}
