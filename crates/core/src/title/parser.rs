//! Heuristic release name parser.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{ParsedTitle, TitleParseError, TitleParser};
use crate::scanner;

/// One character of separator before a tag, or the start of the name.
const PRE: &str = r"(?:^|[\s._\-\[\(])";
/// One character of separator after a tag, or the end of the name.
const POST: &str = r"(?:$|[\s._\-\]\)])";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Episode,
    Season,
    Year,
    Resolution,
    Quality,
    Codec,
    Audio,
    Flag,
    /// Short uppercase scene markers (`CAM`, `TS`, ...).
    Scene,
    Size,
    Bracket,
}

impl Tag {
    /// Tags that reliably mark the end of a title.
    fn is_anchor(self) -> bool {
        matches!(self, Tag::Episode | Tag::Season | Tag::Year | Tag::Resolution)
    }
}

struct TagPattern {
    tag: Tag,
    regex: Regex,
}

static TAG_PATTERNS: Lazy<Vec<TagPattern>> = Lazy::new(|| {
    let bounded = |body: &str| format!(r"(?i){PRE}(?:{body}){POST}");
    let exact = |body: &str| format!(r"{PRE}(?:{body}){POST}");
    let sources = [
        (Tag::Episode, bounded(r"s(\d{1,2})e(\d{1,3})|(\d{1,2})x(\d{2,3})")),
        (Tag::Season, bounded(r"s(\d{1,2})|season[\s._]?(\d{1,2})")),
        (Tag::Year, bounded(r"((?:19|20)\d{2})")),
        (Tag::Resolution, bounded(r"(\d{3,4}[pi]|4k|uhd)")),
        (
            Tag::Quality,
            bounded(
                r"(?:ppv\.)?[hp]dtv|hdcam|camrip|b[dr]rip|bluray|blu-ray|hd-?ts|telesync|web-?dl|web-?rip|hdrip|dvdrip|dvdscr|dvd|remux|hdtc",
            ),
        ),
        (
            Tag::Codec,
            bounded(r"xvid|divx|[hx]\.?26[45]|hevc|avc|10bit|8bit"),
        ),
        (
            Tag::Audio,
            bounded(r"mp3|flac|dts(?:-hd)?|truehd|atmos|dd[p+]?5[\.\s]?1|aac(?:2\.0)?|ac3|dual[\-\s]audio"),
        ),
        (
            Tag::Flag,
            bounded(r"proper|repack|extended(?:[\s.]cut)?|unrated|remastered|limited|internal|(?:half-)?sbs|dubbed|subbed"),
        ),
        (Tag::Scene, exact(r"CAM|TS|HC|WS|3D")),
        (Tag::Size, bounded(r"\d+(?:\.\d+)?\s?(?:gb|mb)")),
        (Tag::Bracket, r"[\[\(][^\]\)]*[\]\)]".to_string()),
    ];

    sources
        .into_iter()
        .map(|(tag, source)| TagPattern {
            tag,
            regex: Regex::new(&source).unwrap(),
        })
        .collect()
});

/// Leading `[site.tag]` prefix.
static SITE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap());

/// Trailing `-GROUP` suffix.
static GROUP_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s?([A-Za-z0-9]+)$").unwrap());

/// Title extractor for scene/release style names such as
/// `The.Movie.2019.1080p.BluRay.x264-GROUP.mkv`.
///
/// The title is whatever precedes the first recognised tag. A tag at the
/// very start of the name is ignored so names like `2012.2009.mkv` keep
/// their leading number.
#[derive(Debug, Clone, Default)]
pub struct ReleaseNameParser;

impl ReleaseNameParser {
    pub fn new() -> Self {
        Self
    }
}

impl TitleParser for ReleaseNameParser {
    fn parse(&self, raw_name: &str) -> Result<ParsedTitle, TitleParseError> {
        let name = strip_extension(raw_name.trim());
        let name = match SITE_PREFIX.find(name) {
            Some(m) => &name[m.end()..],
            None => name,
        };

        // First match of each tag, ignoring a tag at the very start.
        let hits: Vec<_> = TAG_PATTERNS
            .iter()
            .filter_map(|pattern| {
                pattern
                    .regex
                    .captures_iter(name)
                    .find(|caps| caps.get(0).is_some_and(|m| m.start() > 0))
                    .map(|caps| (pattern.tag, caps))
            })
            .collect();

        // Scene markers before an anchor are title words ("Hot.TS.Movie.2015").
        let anchor = hits
            .iter()
            .filter(|(tag, _)| tag.is_anchor())
            .filter_map(|(_, caps)| caps.get(0).map(|m| m.start()))
            .min();

        let mut parsed = ParsedTitle::default();
        let mut cut = name.len();

        for (tag, caps) in &hits {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if *tag == Tag::Scene && anchor.is_some_and(|a| whole.start() < a) {
                continue;
            }
            cut = cut.min(whole.start());

            let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u16>().ok());
            match tag {
                Tag::Episode => {
                    parsed.season = number(1).or_else(|| number(3));
                    parsed.episode = number(2).or_else(|| number(4));
                }
                Tag::Season => {
                    if parsed.season.is_none() {
                        parsed.season = number(1).or_else(|| number(2));
                    }
                }
                Tag::Year => parsed.year = number(1),
                Tag::Resolution => {
                    parsed.resolution = caps.get(1).map(|m| m.as_str().to_ascii_lowercase())
                }
                _ => {}
            }
        }

        if cut < name.len() {
            parsed.group = GROUP_SUFFIX
                .captures(&name[cut..])
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
        }

        parsed.title = clean(&name[..cut]);
        if parsed.title.is_empty() {
            return Err(TitleParseError::NoTitle(raw_name.to_string()));
        }

        Ok(parsed)
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if scanner::classify(name).is_some() => &name[..dot],
        _ => name,
    }
}

fn clean(raw: &str) -> String {
    let spaced = raw.replace(['.', '_'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '[' | '(' | ',' | ':'))
        .to_string()
}
