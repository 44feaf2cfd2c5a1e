//! Display strings for the terminal adapter.
//!
//! The engine only reports semantic values; every sentence the player reads
//! is looked up here by [`Language`].

use std::{fmt, str::FromStr};

use curve_fit_core::Mode;

/// Language used for player-facing text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum Language {
    /// English.
    #[default]
    English,
    /// Russian.
    Russian,
}

impl Language {
    /// Two-letter code persisted in preferences.
    #[must_use]
    pub(crate) const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// The other supported language.
    #[must_use]
    pub(crate) const fn toggled(self) -> Self {
        match self {
            Language::English => Language::Russian,
            Language::Russian => Language::English,
        }
    }

    /// Strings for this language.
    #[must_use]
    pub(crate) const fn texts(self) -> &'static Texts {
        match self {
            Language::English => &ENGLISH,
            Language::Russian => &RUSSIAN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "ru" => Ok(Language::Russian),
            other => Err(format!("unsupported language `{other}`")),
        }
    }
}

/// Player-facing strings for one language.
#[derive(Debug)]
pub(crate) struct Texts {
    pub(crate) title: &'static str,
    pub(crate) linear: &'static str,
    pub(crate) quadratic: &'static str,
    pub(crate) cubic: &'static str,
    pub(crate) success: &'static str,
    pub(crate) fail: &'static str,
    pub(crate) next: &'static str,
    pub(crate) retry: &'static str,
    pub(crate) light: &'static str,
    pub(crate) dark: &'static str,
    pub(crate) targets: &'static str,
    pub(crate) c_unused: &'static str,
    pub(crate) help: &'static str,
}

impl Texts {
    /// Display name of a curve family.
    #[must_use]
    pub(crate) const fn mode(&self, mode: Mode) -> &'static str {
        match mode {
            Mode::Linear => self.linear,
            Mode::Quadratic => self.quadratic,
            Mode::Cubic => self.cubic,
        }
    }
}

static ENGLISH: Texts = Texts {
    title: "Curve Fit",
    linear: "Linear",
    quadratic: "Quadratic",
    cubic: "Cubic",
    success: "Great! The curve passes through every point.",
    fail: "Not quite. Some points are still off the curve.",
    next: "Type `ok` for the next level.",
    retry: "Type `ok` to keep adjusting.",
    light: "Light theme",
    dark: "Dark theme",
    targets: "Targets",
    c_unused: "Linear curves have no c coefficient.",
    help: "Commands:
  a|b|c <value>   set a coefficient (-5..5, step 0.1)
  mode <name>     switch to linear, quadratic or cubic
  check           check the curve against the targets
  ok              dismiss the result
  show            print the equation and targets
  export          print a shareable level code
  load <code>     play a shared level
  theme           toggle light/dark theme
  lang            toggle language
  quit            leave the game",
};

static RUSSIAN: Texts = Texts {
    title: "Подбор кривой",
    linear: "Линейная",
    quadratic: "Квадратичная",
    cubic: "Кубическая",
    success: "Отлично! Кривая проходит через все точки.",
    fail: "Не совсем. Некоторые точки лежат в стороне от кривой.",
    next: "Введите `ok`, чтобы перейти к следующему уровню.",
    retry: "Введите `ok`, чтобы продолжить подбор.",
    light: "Светлая тема",
    dark: "Тёмная тема",
    targets: "Точки",
    c_unused: "У линейной функции нет коэффициента c.",
    help: "Команды:
  a|b|c <число>   задать коэффициент (-5..5, шаг 0.1)
  mode <имя>      выбрать linear, quadratic или cubic
  check           проверить кривую
  ok              закрыть результат
  show            показать уравнение и точки
  export          получить код уровня
  load <код>      сыграть уровень по коду
  theme           переключить тему
  lang            переключить язык
  quit            выйти",
};
