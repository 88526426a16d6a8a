use std::fmt::{self, Display};
use std::io::{self, Write};

use itertools::Itertools;

use crate::config::ColorsConfig;

const CSI: &str = "\x1b[";
const SGR_END: &str = "m";

/// 全属性の解除
pub(crate) const RESET: &str = "\x1b[0m";

const FG_OFFSET: u8 = 30;
const BG_OFFSET: u8 = 40;
const BRIGHT_OFFSET: u8 = 60;

/// 8色パレット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub(crate) enum AnsiColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}
impl AnsiColor {
    pub(crate) const ALL: [AnsiColor; 8] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
    ];

    /// 色名から色を引く
    /// `off` と未知の色名は色なし
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(AnsiColor::Black),
            "red" => Some(AnsiColor::Red),
            "green" => Some(AnsiColor::Green),
            "yellow" => Some(AnsiColor::Yellow),
            "blue" => Some(AnsiColor::Blue),
            // 古い設定との互換のため綴り違いも受け付ける
            "magenta" | "magneta" => Some(AnsiColor::Magenta),
            "cyan" => Some(AnsiColor::Cyan),
            "white" => Some(AnsiColor::White),
            _ => None,
        }
    }

    const fn code(self, offset: u8, bright: bool) -> u8 {
        let code = offset + self as u8;
        if bright { code + BRIGHT_OFFSET } else { code }
    }
}

/// SGR属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub(crate) enum Attribute {
    #[default]
    Normal = 0,
    Bold = 1,
    Faint = 2,
    Underline = 4,
    Blink = 5,
    Negative = 7,
    Conceal = 8,
}
impl Attribute {
    pub(crate) const ALL: [Attribute; 7] = [
        Attribute::Normal,
        Attribute::Bold,
        Attribute::Faint,
        Attribute::Underline,
        Attribute::Blink,
        Attribute::Negative,
        Attribute::Conceal,
    ];

    /// 属性名から属性を引く
    /// `off` と未知の属性名はNormal
    pub(crate) fn from_name(name: &str) -> Self {
        match name {
            "bold" => Attribute::Bold,
            "faint" => Attribute::Faint,
            "underline" => Attribute::Underline,
            "blink" => Attribute::Blink,
            "negative" => Attribute::Negative,
            "conceal" => Attribute::Conceal,
            _ => Attribute::Normal,
        }
    }
}

/// 端末出力のスタイル
///
/// 構築後は変更しない値型。`enabled` が偽のときは `render` は入力をそのまま返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColorSpec {
    pub(crate) fg: Option<AnsiColor>,
    pub(crate) bg: Option<AnsiColor>,
    pub(crate) attr: Attribute,
    pub(crate) enabled: bool,
    pub(crate) bright_fg: bool,
    pub(crate) bright_bg: bool,
}
impl Default for ColorSpec {
    fn default() -> Self {
        Self::new()
    }
}
impl ColorSpec {
    pub(crate) const fn new() -> Self {
        ColorSpec {
            fg: None,
            bg: None,
            attr: Attribute::Normal,
            enabled: true,
            bright_fg: false,
            bright_bg: false,
        }
    }

    pub(crate) const fn fg(self, color: AnsiColor) -> Self {
        ColorSpec {
            fg: Some(color),
            ..self
        }
    }

    pub(crate) const fn bg(self, color: AnsiColor) -> Self {
        ColorSpec {
            bg: Some(color),
            ..self
        }
    }

    pub(crate) const fn attr(self, attr: Attribute) -> Self {
        ColorSpec { attr, ..self }
    }

    pub(crate) const fn enabled(self, enabled: bool) -> Self {
        ColorSpec { enabled, ..self }
    }

    pub(crate) const fn bright_fg(self, bright_fg: bool) -> Self {
        ColorSpec { bright_fg, ..self }
    }

    pub(crate) const fn bright_bg(self, bright_bg: bool) -> Self {
        ColorSpec { bright_bg, ..self }
    }

    /// 属性、前景色、背景色の順に `;` で繋いだSGRシーケンス
    pub(crate) fn escape(&self) -> String {
        let codes = std::iter::once(self.attr as u8)
            .chain(self.fg.map(|c| c.code(FG_OFFSET, self.bright_fg)))
            .chain(self.bg.map(|c| c.code(BG_OFFSET, self.bright_bg)))
            .join(";");
        format!("{CSI}{codes}{SGR_END}")
    }

    pub(crate) fn render(&self, text: &str) -> String {
        if self.enabled {
            format!("{}{text}{RESET}", self.escape())
        } else {
            text.to_string()
        }
    }
}
impl Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escape())
    }
}

/// ステータス表示に使う配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatusPalette {
    pub(crate) title: ColorSpec,
    pub(crate) on: ColorSpec,
    pub(crate) off: ColorSpec,
}
impl Default for StatusPalette {
    fn default() -> Self {
        StatusPalette {
            title: ColorSpec::new().fg(AnsiColor::Blue),
            on: ColorSpec::new().fg(AnsiColor::Green),
            off: ColorSpec::new().fg(AnsiColor::Red),
        }
    }
}
impl From<&ColorsConfig> for StatusPalette {
    fn from(value: &ColorsConfig) -> Self {
        let attr = Attribute::from_name(&value.attr);
        let spec = |name: &str| ColorSpec {
            fg: AnsiColor::from_name(name),
            attr,
            ..ColorSpec::new()
        };
        StatusPalette {
            title: spec(&value.title),
            on: spec(&value.on),
            off: spec(&value.off),
        }
    }
}
impl StatusPalette {
    pub(crate) fn with_enabled(self, enabled: bool) -> Self {
        StatusPalette {
            title: self.title.enabled(enabled),
            on: self.on.enabled(enabled),
            off: self.off.enabled(enabled),
        }
    }

    /// ステータス文字列に対応する色を付ける (大文字小文字を区別)
    pub(crate) fn colorize(&self, status: &str) -> String {
        match status {
            "UP" | "OPEN" => self.on.render(status),
            "DOWN" => self.off.render(status),
            _ => status.to_string(),
        }
    }

    pub(crate) fn title(&self, name: &str) -> String {
        self.title.render(name)
    }
}

/// 全色/全属性の組み合わせの見本を書き出す
pub(crate) fn color_chart(out: &mut impl Write) -> io::Result<()> {
    const SAMPLE: &str = "Hello World!";

    for fg in AnsiColor::ALL {
        for bg in AnsiColor::ALL {
            for attr in Attribute::ALL {
                let spec = ColorSpec::new().fg(fg).bg(bg).attr(attr);
                let variants = [
                    spec,
                    spec.bright_fg(true),
                    spec.bright_fg(true).bright_bg(true),
                ];
                for variant in variants {
                    writeln!(out, "{} {variant:?}", variant.render(SAMPLE))?;
                }
            }
        }
    }
    Ok(())
}
