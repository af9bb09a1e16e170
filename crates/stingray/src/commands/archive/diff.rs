use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    path::PathBuf,
};
use stingray_toc::{bank::SoundBank, Archive, AudioPayload};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    #[default]
    Semantic,
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, String, Vec<Change>, Vec<Change>),
}

impl Change {
    fn modified(kind: &str, name: impl Into<String>) -> Change {
        Change::Modified(kind.into(), name.into(), Vec::new(), Vec::new())
    }

    fn comparison(key: &str, old: impl Display, new: impl Display) -> Change {
        Change::Comparison(key.into(), old.to_string(), new.to_string())
    }

    pub fn with_children(&mut self, children: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, vec, _) => {
                vec.extend(children);
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add children to an addition or removal")),
        }
    }

    pub fn with_related(&mut self, related: Vec<Change>) -> Result<()> {
        match self {
            Change::Modified(_, _, _, vec) => {
                vec.extend(related);
                vec.sort();
                Ok(())
            }
            _ => Err(miette!("tried to add related to an addition or removal")),
        }
    }
}

impl Ord for Change {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Change::Added(key, value), Change::Added(other_key, other_value))
            | (Change::Removed(key, value), Change::Removed(other_key, other_value)) => {
                Some(key.cmp(other_key).then(value.cmp(other_value)))
            }
            (Change::Comparison(key, _, _), Change::Comparison(other_key, _, _)) => {
                Some(key.cmp(other_key))
            }
            (
                Change::Modified(key, value, children, _),
                Change::Modified(other_key, other_value, other_children, _),
            ) => Some(
                key.cmp(other_key)
                    .then(value.cmp(other_value))
                    .then(children.cmp(other_children)),
            ),
            _ => None,
        }
    }
}

fn indent(text: &str) -> String {
    text.split('\n').map(|l| "  ".to_string() + l).join("\n")
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(_, v) => writeln!(f, "✅ {}", v.green()),
            Change::Removed(_, v) => writeln!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(values) => {
                writeln!(f, "{}", values.iter().map(|l| format!(" {l}")).join("\n"))
            }
            Change::Modified(_, v, children, related) => {
                let mut text = related.iter().map(|c| c.to_string()).join("");

                // children are sorted, so each kind of change forms one group
                for (heading, group) in &children.iter().chunk_by(|c| match c {
                    Change::Added(key, _) => format!("* {key} added:"),
                    Change::Removed(key, _) => format!("* {key} removed:"),
                    Change::Modified(key, _, _, _) => format!("* {key} modified:"),
                    _ => String::new(),
                }) {
                    if !heading.is_empty() {
                        text.push_str(&heading);
                        text.push('\n');
                    }
                    text.push_str(&indent(&group.map(|c| c.to_string()).join("")));
                    text.push('\n');
                }

                writeln!(f, "🔃 {}", v.blue())?;
                writeln!(
                    f,
                    "{}",
                    text.split('\n')
                        .filter(|l| l.trim().len() > 1)
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

/// Payloads of `bank` keyed by short id
fn audio_of<'a>(archive: &'a Archive, bank: &SoundBank) -> BTreeMap<u32, &'a AudioPayload> {
    bank.content
        .iter()
        .filter_map(|id| archive.audio.get(id))
        .map(|audio| (audio.short_id, audio))
        .collect()
}

/// Lists the keys only in `right` as additions and the keys only in `left` as removals
fn added_and_removed<K: Ord + Display>(
    kind: &str,
    left: &BTreeSet<K>,
    right: &BTreeSet<K>,
) -> Vec<Change> {
    let added = right
        .difference(left)
        .map(|k| Change::Added(kind.into(), k.to_string()));
    let removed = left
        .difference(right)
        .map(|k| Change::Removed(kind.into(), k.to_string()));
    added.chain(removed).collect()
}

#[derive(Args)]
pub struct DiffArgs {
    /// The archive compared against, usually the unmodified one
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// The archive whose changes are listed
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,

    /// Language of the compared strings
    #[arg(long, default_value = "English (US)")]
    language: String,
}

impl DiffArgs {
    fn handle_audio(&self, left: &AudioPayload, right: &AudioPayload) -> Option<Change> {
        if left.size() != right.size() {
            return Some(Change::Modified(
                "audio".into(),
                left.short_id.to_string(),
                Vec::new(),
                vec![Change::comparison("size", left.size(), right.size())],
            ));
        }
        if self.mode == Mode::Full && left.bytes() != right.bytes() {
            return Some(Change::Modified(
                "audio".into(),
                left.short_id.to_string(),
                Vec::new(),
                vec![Change::Context(vec!["contents differ".into()])],
            ));
        }
        None
    }

    fn handle_bank(
        &self,
        left: (&Archive, &SoundBank),
        right: (&Archive, &SoundBank),
    ) -> Result<Option<Change>> {
        let ((left_archive, left), (right_archive, right)) = (left, right);
        let mut result: Option<Change> = None;

        if left.hierarchy.len() != right.hierarchy.len() {
            result
                .get_or_insert_with(|| Change::modified("banks", left.name()))
                .with_related(vec![Change::comparison(
                    "records",
                    left.hierarchy.len(),
                    right.hierarchy.len(),
                )])?;
        }

        if self.mode == Mode::Full && left.header != right.header {
            result
                .get_or_insert_with(|| Change::modified("banks", left.name()))
                .with_related(vec![Change::comparison(
                    "header",
                    format!("{:02X?}", left.header),
                    format!("{:02X?}", right.header),
                )])?;
        }

        let left_audio = audio_of(left_archive, left);
        let right_audio = audio_of(right_archive, right);

        let mut children = added_and_removed(
            "audio",
            &left_audio.keys().copied().collect(),
            &right_audio.keys().copied().collect(),
        );
        children.extend(
            left_audio
                .iter()
                .filter_map(|(id, audio)| Some((audio, right_audio.get(id)?)))
                .filter_map(|(l, r)| self.handle_audio(l, r)),
        );

        if !children.is_empty() {
            result
                .get_or_insert_with(|| Change::modified("banks", left.name()))
                .with_children(children)?;
        }

        Ok(result)
    }

    fn handle_strings(&self, language: u32, left: &Archive, right: &Archive) -> Vec<Change> {
        let left_strings = left.strings(language).collect::<BTreeMap<_, _>>();
        let right_strings = right.strings(language).collect::<BTreeMap<_, _>>();

        let mut result = added_and_removed(
            "strings",
            &left_strings.keys().copied().collect(),
            &right_strings.keys().copied().collect(),
        );

        for (id, old) in &left_strings {
            let Some(new) = right_strings.get(id) else {
                continue;
            };

            let diff = TextDiff::from_lines(*old, *new);
            if diff.ratio() >= 1.0 {
                continue;
            }

            let mut comparison = Vec::new();
            if self.mode == Mode::Full {
                for op in diff.ops() {
                    for change in diff.iter_inline_changes(op) {
                        let mut context = String::new();
                        for (emphasized, value) in change.iter_strings_lossy() {
                            let styled = match (emphasized, change.tag()) {
                                (true, ChangeTag::Insert) => value.green().underline().to_string(),
                                (true, _) => value.red().underline().to_string(),
                                (false, _) => value.dimmed().to_string(),
                            };
                            context.push_str(&styled);
                        }
                        comparison.push(context);
                    }
                }
            }
            result.push(Change::Modified(
                "strings".into(),
                id.to_string(),
                vec![],
                vec![Change::Context(comparison)],
            ));
        }

        result
    }

    fn handle_archive(
        &self,
        language: u32,
        left: &Archive,
        right: &Archive,
    ) -> Result<Option<Change>> {
        let mut result: Option<Change> = None;
        let name = left.name().to_string();

        for (key, l, r) in [
            ("banks", left.banks.len(), right.banks.len()),
            ("streams", left.streams.len(), right.streams.len()),
            ("text banks", left.text_banks.len(), right.text_banks.len()),
        ] {
            if l != r {
                result
                    .get_or_insert_with(|| Change::modified("archive", &name))
                    .with_related(vec![Change::comparison(key, l, r)])?;
            }
        }

        let left_banks = left
            .banks
            .values()
            .map(|b| (b.name(), b))
            .collect::<BTreeMap<_, _>>();
        let right_banks = right
            .banks
            .values()
            .map(|b| (b.name(), b))
            .collect::<BTreeMap<_, _>>();

        let mut children = added_and_removed(
            "banks",
            &left_banks.keys().cloned().collect(),
            &right_banks.keys().cloned().collect(),
        );
        for (bank_name, l) in &left_banks {
            let Some(r) = right_banks.get(bank_name) else {
                continue;
            };
            if let Some(change) = self.handle_bank((left, l), (right, r))? {
                children.push(change);
            }
        }
        children.extend(self.handle_strings(language, left, right));

        if !children.is_empty() {
            result
                .get_or_insert_with(|| Change::modified("archive", &name))
                .with_children(children)?;
        }

        Ok(result)
    }

    pub fn handle(&self) -> Result<()> {
        let language = super::language(&self.language)?;
        let left = super::open(&self.left, language)?;
        let right = super::open(&self.right, language)?;

        if let Some(d) = self.handle_archive(language, &left, &right)? {
            println!("{}", d);
        }

        Ok(())
    }
}
