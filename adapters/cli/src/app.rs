//! Line-driven session controller.
//!
//! Translates typed input into world commands, keeps the curve sampler in
//! sync through world events and hands a fresh scene to the rendering backend
//! after every command.

use std::{fmt, str::FromStr};

use anyhow::{Context, Result};
use curve_fit_core::{CanvasTransform, Coefficient, Command, Event, Mode};
use curve_fit_rendering::{
    EquationView, Presentation, RenderingBackend, Scene, SliderView, Theme, ViewportPresentation,
};
use curve_fit_system_curve_sampling::CurveSampler;
use curve_fit_world::{apply, query, World};

use crate::{
    level_transfer::LevelCode,
    localization::Language,
    preferences::{self, PreferenceStore},
};

/// A single parsed line of player input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    /// Moves a coefficient slider.
    Set {
        /// Slider being moved.
        coefficient: Coefficient,
        /// Requested value before quantization.
        value: f64,
    },
    /// Switches the curve family.
    Mode(Mode),
    /// Checks the curve against the targets.
    Check,
    /// Dismisses the result notification.
    Acknowledge,
    /// Prints the equation and targets.
    Show,
    /// Prints a shareable level code.
    Export,
    /// Plays the level described by a level code.
    Load(String),
    /// Toggles the light/dark theme.
    Theme,
    /// Toggles the display language.
    Language,
    /// Prints the command reference.
    Help,
    /// Ends the session.
    Quit,
}

impl FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Err(InputError::Empty);
        };
        let argument = words.next();
        if words.next().is_some() {
            return Err(InputError::TrailingInput(line.trim().to_owned()));
        }

        let keyword = keyword.to_ascii_lowercase();
        if let Ok(coefficient) = keyword.parse::<Coefficient>() {
            let raw = argument.ok_or(InputError::MissingArgument("value"))?;
            let value = raw
                .parse::<f64>()
                .map_err(|_| InputError::InvalidNumber(raw.to_owned()))?;
            return Ok(Input::Set { coefficient, value });
        }

        let input = match keyword.as_str() {
            "mode" => {
                let name = argument.ok_or(InputError::MissingArgument("mode"))?;
                let mode = name
                    .parse()
                    .map_err(|_| InputError::UnknownMode(name.to_owned()))?;
                return Ok(Input::Mode(mode));
            }
            "load" => {
                let code = argument.ok_or(InputError::MissingArgument("level code"))?;
                return Ok(Input::Load(code.to_owned()));
            }
            "check" => Input::Check,
            "ok" => Input::Acknowledge,
            "show" => Input::Show,
            "export" => Input::Export,
            "theme" => Input::Theme,
            "lang" => Input::Language,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            other => return Err(InputError::UnknownCommand(other.to_owned())),
        };
        if argument.is_some() {
            return Err(InputError::TrailingInput(line.trim().to_owned()));
        }
        Ok(input)
    }
}

/// Reasons a line of input could not be understood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputError {
    /// The line was blank.
    Empty,
    /// The first word is not a known command.
    UnknownCommand(String),
    /// A command was missing its argument.
    MissingArgument(&'static str),
    /// A coefficient value was not a number.
    InvalidNumber(String),
    /// The mode name was not recognized.
    UnknownMode(String),
    /// The command received more words than it accepts.
    TrailingInput(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::UnknownCommand(command) => {
                write!(f, "unknown command `{command}`, type `help` for a list")
            }
            Self::MissingArgument(argument) => write!(f, "missing {argument}"),
            Self::InvalidNumber(value) => write!(f, "`{value}` is not a number"),
            Self::UnknownMode(mode) => {
                write!(f, "unknown mode `{mode}`, expected linear, quadratic or cubic")
            }
            Self::TrailingInput(line) => write!(f, "unexpected input in `{line}`"),
        }
    }
}

impl std::error::Error for InputError {}

/// Semantic result of executing an input line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Reply {
    /// A coefficient took the provided value.
    CoefficientSet {
        /// Coefficient that changed.
        coefficient: Coefficient,
        /// Quantized value applied.
        value: f64,
    },
    /// The `c` coefficient was addressed in linear mode.
    CoefficientUnused,
    /// A new level of the given family started.
    LevelStarted(Mode),
    /// The curve was checked.
    Checked {
        /// Whether every target was matched.
        succeeded: bool,
    },
    /// The notification was dismissed; `advanced` reports a new level.
    Dismissed {
        /// Whether dismissal advanced to a new level.
        advanced: bool,
    },
    /// Nothing awaited acknowledgement.
    NothingPending,
    /// Current equation and targets were requested.
    Summary,
    /// A level code was produced.
    LevelCode(String),
    /// A level code could not be decoded.
    InvalidLevel(String),
    /// The theme changed.
    ThemeChanged(Theme),
    /// The language changed.
    LanguageChanged(Language),
    /// The command reference was requested.
    Help,
    /// The session should end.
    Quit,
}

/// Interactive session bound to a rendering backend and preference store.
pub(crate) struct App<B> {
    world: World,
    sampler: CurveSampler,
    viewport: ViewportPresentation,
    backend: B,
    preferences: Box<dyn PreferenceStore>,
    theme: Theme,
    language: Language,
    events: Vec<Event>,
}

impl<B: RenderingBackend> App<B> {
    /// Creates a session that restores theme and language from `preferences`.
    pub(crate) fn new(
        world: World,
        backend: B,
        store: Box<dyn PreferenceStore>,
    ) -> Result<Self> {
        let viewport = ViewportPresentation::new(CanvasTransform::default())
            .context("default viewport is invalid")?;
        let theme = preferences::load_theme(&*store);
        let language = preferences::load_language(&*store);
        Ok(Self {
            world,
            sampler: CurveSampler::default(),
            viewport,
            backend,
            preferences: store,
            theme,
            language,
            events: Vec::new(),
        })
    }

    /// Executes one input and presents the resulting frame.
    ///
    /// Output failures are logged rather than returned: the command has
    /// already been applied to the world and the session carries on.
    pub(crate) fn execute(&mut self, input: Input) -> Reply {
        let reply = match input {
            Input::Set { coefficient, value } => {
                if coefficient == Coefficient::C && !query::mode(&self.world).uses_c() {
                    Reply::CoefficientUnused
                } else {
                    let value = SliderView::quantize(value);
                    self.dispatch(Command::SetCoefficient { coefficient, value });
                    Reply::CoefficientSet { coefficient, value }
                }
            }
            Input::Mode(mode) => {
                self.dispatch(Command::ChangeMode { mode });
                Reply::LevelStarted(mode)
            }
            Input::Check => {
                self.dispatch(Command::Check);
                let succeeded = query::last_check(&self.world).unwrap_or(false);
                Reply::Checked { succeeded }
            }
            Input::Acknowledge => {
                self.dispatch(Command::Acknowledge);
                match self.events.as_slice() {
                    [] => Reply::NothingPending,
                    events => Reply::Dismissed {
                        advanced: events
                            .iter()
                            .any(|event| matches!(event, Event::LevelStarted { .. })),
                    },
                }
            }
            Input::Show => Reply::Summary,
            Input::Export => Reply::LevelCode(self.level_code().encode()),
            Input::Load(code) => match LevelCode::decode(&code) {
                Ok(level) => {
                    let mode = level.mode;
                    self.load(level);
                    Reply::LevelStarted(mode)
                }
                Err(error) => {
                    log::warn!("rejected level code: {error}");
                    Reply::InvalidLevel(error.to_string())
                }
            },
            Input::Theme => {
                self.theme = self.theme.toggled();
                if let Err(error) = preferences::save_theme(&mut *self.preferences, self.theme) {
                    log::warn!("failed to save theme preference: {error:#}");
                }
                Reply::ThemeChanged(self.theme)
            }
            Input::Language => {
                self.language = self.language.toggled();
                if let Err(error) =
                    preferences::save_language(&mut *self.preferences, self.language)
                {
                    log::warn!("failed to save language preference: {error:#}");
                }
                Reply::LanguageChanged(self.language)
            }
            Input::Help => Reply::Help,
            Input::Quit => return Reply::Quit,
        };
        if let Err(error) = self.present() {
            log::warn!("failed to present frame: {error:#}");
        }
        reply
    }

    /// Replaces the current level with a decoded one.
    pub(crate) fn load(&mut self, level: LevelCode) {
        self.dispatch(Command::LoadLevel {
            mode: level.mode,
            targets: level.targets,
        });
    }

    /// Hands the current scene to the rendering backend.
    pub(crate) fn present(&mut self) -> Result<()> {
        let mode = query::mode(&self.world);
        let coefficients = query::coefficients(&self.world);
        let curve = self
            .sampler
            .path(coefficients, mode, *self.viewport.transform())
            .clone();
        let scene = Scene::new(
            self.viewport,
            mode,
            coefficients,
            query::targets(&self.world),
            curve,
            query::pending_notification(&self.world),
        );
        let presentation = Presentation::new(self.language.texts().title, self.theme, scene);
        self.backend.present(&presentation)
    }

    /// Localized text for a reply.
    pub(crate) fn describe(&self, reply: &Reply) -> String {
        let texts = self.language.texts();
        match reply {
            Reply::CoefficientSet { coefficient, value } => {
                format!("{coefficient} = {value:.1} | {}", self.equation())
            }
            Reply::CoefficientUnused => texts.c_unused.to_owned(),
            Reply::LevelStarted(mode) => self.summary(*mode),
            Reply::Dismissed { advanced: true } | Reply::Summary => {
                self.summary(query::mode(&self.world))
            }
            Reply::Checked { succeeded: true } => format!("{}\n{}", texts.success, texts.next),
            Reply::Checked { succeeded: false } => format!("{}\n{}", texts.fail, texts.retry),
            Reply::Dismissed { advanced: false } => self.equation(),
            Reply::NothingPending | Reply::Quit => String::new(),
            Reply::LevelCode(code) => code.clone(),
            Reply::InvalidLevel(error) => error.clone(),
            Reply::ThemeChanged(Theme::Light) => texts.light.to_owned(),
            Reply::ThemeChanged(Theme::Dark) => texts.dark.to_owned(),
            Reply::LanguageChanged(language) => {
                format!("{} ({language})", language.texts().title)
            }
            Reply::Help => texts.help.to_owned(),
        }
    }

    fn dispatch(&mut self, command: Command) {
        self.events.clear();
        apply(&mut self.world, command, &mut self.events);
        for event in &self.events {
            log::trace!("world event: {event:?}");
        }
        self.sampler.handle(&self.events);
    }

    fn level_code(&self) -> LevelCode {
        LevelCode {
            mode: query::mode(&self.world),
            targets: query::targets(&self.world).clone(),
        }
    }

    fn summary(&self, mode: Mode) -> String {
        let texts = self.language.texts();
        let points = query::targets(&self.world)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} | {}\n{}: {points}",
            texts.mode(mode),
            self.equation(),
            texts.targets
        )
    }

    fn equation(&self) -> String {
        EquationView::new(query::mode(&self.world), query::coefficients(&self.world)).to_string()
    }
}
