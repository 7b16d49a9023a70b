//! Page layout: turns the catalog and the current filter result into a
//! vertical stack of blocks with stable element ids and row positions.
//!
//! Rows are produced here as plain text segments tagged with a [`Role`] so the
//! layout (and therefore every visibility ratio) is independent of the theme.
//! The renderer maps roles to styles and draws exactly these rows.

use std::collections::HashMap;

use crate::model::catalog::Catalog;
use crate::model::entry::{Entry, LinkKind};
use crate::ops::filter::FilterState;
use crate::util::unicode::{display_width, truncate_to_width};

use super::wrap::wrap_text;

pub const HOME: &str = "home";
pub const PROJECTS: &str = "projects";
pub const CERTS: &str = "certs";
pub const CONTACT: &str = "contact";

/// Blank rows between blocks
const GAP: usize = 1;
/// Tags shown on an entry card
const CARD_TAGS: usize = 4;

const HIGHLIGHTS: [(&str, &str); 4] = [
    ("Dashboards", "Modern UI, component design, state flows, responsiveness."),
    ("Workflows", "CRUD systems, role-based flows, validation, reporting."),
    ("Automation", "APIs, integrations, queued operations, logging."),
    ("Visualization", "Readable charts, summaries, and insight-driven UI."),
];

/// Semantic style of a text segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Border,
    Title,
    Text,
    Dim,
    Accent,
    Tag,
    /// Year badge; blue for React/Java primaries, red otherwise
    Year { blue: bool },
    Link,
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seg {
    pub text: String,
    pub role: Role,
}

impl Seg {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Seg {
            text: text.into(),
            role,
        }
    }
}

pub type Row = Vec<Seg>;

/// Plain text of a row (for tests and measurements)
pub fn row_text(row: &Row) -> String {
    row.iter().map(|s| s.text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Hero,
    Highlights,
    SectionHead(&'static str),
    /// Index into the catalog's entries
    Entry(usize),
    NoResults,
    /// Index into the catalog's credentials
    Credential(usize),
    Reach,
    Profiles,
    Footer,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    /// Landmark (page section) this block belongs to
    pub landmark: &'static str,
    /// First page row
    pub top: usize,
    pub rows: Vec<Row>,
    /// Whether the block takes part in reveal-on-scroll
    pub revealable: bool,
}

impl Block {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn bottom(&self) -> usize {
        self.top + self.rows.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub width: usize,
    pub blocks: Vec<Block>,
    pub height: usize,
}

impl PageLayout {
    /// Lay out the whole page. `visible` are the filtered entry indices in order.
    pub fn build(
        catalog: &Catalog,
        visible: &[usize],
        filter: &FilterState,
        width: usize,
        year: i32,
    ) -> Self {
        let width = width.max(12);
        let mut builder = Builder {
            width,
            top: 0,
            blocks: Vec::new(),
        };

        builder.push("hero", BlockKind::Hero, HOME, true, hero_rows(catalog, width));
        builder.push("highlights", BlockKind::Highlights, HOME, true, highlight_rows(width));

        builder.push(
            "head:projects",
            BlockKind::SectionHead(PROJECTS),
            PROJECTS,
            true,
            head_rows(
                "Projects",
                "No filler, no placeholders, just the work that matters.",
                Some(filter_row(filter, visible.len(), catalog.entries().len())),
                width,
            ),
        );
        if visible.is_empty() {
            builder.push(
                "empty:projects",
                BlockKind::NoResults,
                PROJECTS,
                false,
                wrap_rows("No entries match this filter.", Role::Dim, width),
            );
        }
        for &idx in visible {
            if let Some(entry) = catalog.entry(idx) {
                builder.push(
                    &entry.element_id(),
                    BlockKind::Entry(idx),
                    PROJECTS,
                    true,
                    entry_rows(entry, width),
                );
            }
        }

        builder.push(
            "head:certs",
            BlockKind::SectionHead(CERTS),
            CERTS,
            true,
            head_rows(
                "Certifications",
                "Focused credentials that support real build skills.",
                None,
                width,
            ),
        );
        for (idx, cred) in catalog.credentials().iter().enumerate() {
            let mut content = wrap_rows(&cred.summary, Role::Text, inner(width));
            let badges: Vec<Seg> = cred
                .tags
                .iter()
                .enumerate()
                .map(|(i, t)| Seg::new(format!("[{}]", t), if i == 0 { Role::Accent } else { Role::Tag }))
                .collect();
            content.extend(flow(badges, inner(width)));
            builder.push(
                &cred.element_id(),
                BlockKind::Credential(idx),
                CERTS,
                true,
                boxed(&cred.title, content, width),
            );
        }

        builder.push(
            "head:contact",
            BlockKind::SectionHead(CONTACT),
            CONTACT,
            true,
            head_rows(
                "Contact",
                "Internships, junior roles, freelance builds, or collaborations.",
                None,
                width,
            ),
        );
        builder.push("contact:reach", BlockKind::Reach, CONTACT, true, reach_rows(catalog, width));
        builder.push("contact:profiles", BlockKind::Profiles, CONTACT, true, profile_rows(catalog, width));
        let owner = &catalog.profile().name;
        builder.push(
            "footer",
            BlockKind::Footer,
            CONTACT,
            true,
            vec![
                vec![Seg::new("\u{2500}".repeat(width), Role::Border)],
                fit_row(vec![Seg::new(format!("\u{00A9} {} {}", year, owner), Role::Dim)], width),
            ],
        );

        let height = builder.top.saturating_sub(GAP);
        PageLayout {
            width,
            blocks: builder.blocks,
            height,
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Card block for a catalog entry, if rendered
    pub fn entry_block(&self, entry: usize) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind == BlockKind::Entry(entry))
    }

    /// Ids of revealable blocks, top to bottom
    pub fn revealable_ids(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| b.revealable)
            .map(|b| b.id.clone())
            .collect()
    }

    /// Row span (top, height) of a landmark section
    pub fn landmark_span(&self, landmark: &str) -> Option<(usize, usize)> {
        let mut blocks = self.blocks.iter().filter(|b| b.landmark == landmark);
        let first = blocks.next()?;
        let last = blocks.last().unwrap_or(first);
        Some((first.top, last.bottom() - first.top))
    }

    /// Every element the host can resolve: blocks and landmark sections
    pub fn element_spans(&self) -> HashMap<String, (usize, usize)> {
        let mut spans: HashMap<String, (usize, usize)> = self
            .blocks
            .iter()
            .map(|b| (b.id.clone(), (b.top, b.height())))
            .collect();
        for landmark in [HOME, PROJECTS, CERTS, CONTACT] {
            if let Some(span) = self.landmark_span(landmark) {
                spans.insert(landmark.to_string(), span);
            }
        }
        spans
    }

    /// The block covering page row `row`, if any
    pub fn block_at(&self, row: usize) -> Option<&Block> {
        self.blocks.iter().find(|b| b.top <= row && row < b.bottom())
    }
}

struct Builder {
    width: usize,
    top: usize,
    blocks: Vec<Block>,
}

impl Builder {
    fn push(&mut self, id: &str, kind: BlockKind, landmark: &'static str, revealable: bool, rows: Vec<Row>) {
        debug_assert!(rows.iter().all(|r| display_width(&row_text(r)) <= self.width));
        let height = rows.len();
        self.blocks.push(Block {
            id: id.to_string(),
            kind,
            landmark,
            top: self.top,
            rows,
            revealable,
        });
        self.top += height + GAP;
    }
}

/// Usable width inside a box
fn inner(width: usize) -> usize {
    width.saturating_sub(4).max(1)
}

fn wrap_rows(text: &str, role: Role, width: usize) -> Vec<Row> {
    wrap_text(text, width)
        .into_iter()
        .map(|line| vec![Seg::new(line, role)])
        .collect()
}

/// Place segments left to right separated by a space, starting a new row when
/// the next one does not fit. Oversized segments are truncated.
fn flow(segs: Vec<Seg>, width: usize) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut used = 0;
    for mut seg in segs {
        let mut w = display_width(&seg.text);
        if w > width {
            seg.text = truncate_to_width(&seg.text, width);
            w = display_width(&seg.text);
        }
        if used > 0 && used + 1 + w > width {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        if used > 0 {
            row.push(Seg::new(" ", Role::Text));
            used += 1;
        }
        row.push(seg);
        used += w;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Draw a rounded box around `content`, with `title` set into the top border.
fn boxed(title: &str, content: Vec<Row>, width: usize) -> Vec<Row> {
    let inner_w = inner(width);
    let title = truncate_to_width(title, width.saturating_sub(6).max(1));
    let fill = width.saturating_sub(display_width(&title) + 5);

    let mut rows = Vec::with_capacity(content.len() + 2);
    rows.push(vec![
        Seg::new("\u{256D}\u{2500} ", Role::Border),
        Seg::new(title, Role::Title),
        Seg::new(format!(" {}\u{256E}", "\u{2500}".repeat(fill)), Role::Border),
    ]);
    for mut row in content {
        let used: usize = row.iter().map(|s| display_width(&s.text)).sum();
        row.insert(0, Seg::new("\u{2502} ", Role::Border));
        row.push(Seg::new(" ".repeat(inner_w.saturating_sub(used)), Role::Text));
        row.push(Seg::new(" \u{2502}", Role::Border));
        rows.push(row);
    }
    rows.push(vec![Seg::new(
        format!("\u{2570}{}\u{256F}", "\u{2500}".repeat(width.saturating_sub(2))),
        Role::Border,
    )]);
    rows
}

fn head_rows(title: &str, desc: &str, extra: Option<Row>, width: usize) -> Vec<Row> {
    let title = truncate_to_width(title, width.saturating_sub(4));
    let title_w = display_width(&title);
    let mut rows = vec![vec![
        Seg::new("\u{2500}\u{2500} ", Role::Border),
        Seg::new(title, Role::Title),
        Seg::new(
            format!(" {}", "\u{2500}".repeat(width.saturating_sub(title_w + 4))),
            Role::Border,
        ),
    ]];
    rows.extend(wrap_rows(desc, Role::Dim, width));
    if let Some(extra) = extra {
        rows.push(fit_row(extra, width));
    }
    rows
}

/// Filter summary line shown under the Projects heading
fn filter_row(filter: &FilterState, shown: usize, total: usize) -> Row {
    let query = if filter.query.is_empty() {
        Seg::new("(any)", Role::Dim)
    } else {
        Seg::new(format!("\"{}\"", filter.query), Role::Accent)
    };
    vec![
        Seg::new("search ", Role::Dim),
        query,
        Seg::new("  tag ", Role::Dim),
        Seg::new(format!("[{}]", filter.active_tag), Role::Accent),
        Seg::new(format!("  {} of {}", shown, total), Role::Dim),
    ]
}

/// Truncate a row's segments so the whole row fits `width`
fn fit_row(row: Row, width: usize) -> Row {
    let mut out = Vec::new();
    let mut left = width;
    for seg in row {
        if left == 0 {
            break;
        }
        let w = display_width(&seg.text);
        if w <= left {
            left -= w;
            out.push(seg);
        } else {
            out.push(Seg::new(truncate_to_width(&seg.text, left), seg.role));
            left = 0;
        }
    }
    out
}

fn year_is_blue(entry: &Entry) -> bool {
    matches!(entry.primary_tag.as_str(), "React" | "Java")
}

fn entry_rows(entry: &Entry, width: usize) -> Vec<Row> {
    let inner_w = inner(width);
    let mut badges = vec![Seg::new(
        format!("[{}]", entry.year),
        Role::Year {
            blue: year_is_blue(entry),
        },
    )];
    badges.extend(
        entry
            .tags
            .iter()
            .take(CARD_TAGS)
            .map(|t| Seg::new(format!("[{}]", t), Role::Tag)),
    );
    badges.push(Seg::new("\u{26A1} Featured", Role::Accent));

    let mut content = flow(badges, inner_w);
    content.extend(wrap_rows(&entry.summary, Role::Text, inner_w));
    let links: Vec<Seg> = entry
        .links
        .iter()
        .map(|l| match l.kind {
            LinkKind::Detail => Seg::new(format!("\u{25C9} {}", l.label), Role::Link),
            LinkKind::External => Seg::new(format!("\u{2197} {}", l.label), Role::Link),
        })
        .collect();
    content.extend(flow(links, inner_w));
    boxed(&entry.title, content, width)
}

fn hero_rows(catalog: &Catalog, width: usize) -> Vec<Row> {
    let profile = catalog.profile();
    let inner_w = inner(width);
    let mut content = vec![fit_row(
        vec![
            Seg::new("\u{25CF} ", Role::Accent),
            Seg::new("Building clean, fast, production-style apps", Role::Dim),
        ],
        inner_w,
    )];
    content.push(Vec::new());
    content.extend(wrap_rows(&profile.headline, Role::Title, inner_w));
    if !profile.intro.is_empty() {
        content.push(Vec::new());
        content.extend(wrap_rows(&profile.intro, Role::Text, inner_w));
    }
    if !profile.skills.is_empty() {
        content.push(Vec::new());
        let skills = profile
            .skills
            .iter()
            .map(|s| Seg::new(format!("[{}]", s), Role::Tag))
            .collect();
        content.extend(flow(skills, inner_w));
    }
    content.push(Vec::new());
    content.extend(flow(
        vec![
            Seg::new("p", Role::Key),
            Seg::new("View Projects ", Role::Text),
            Seg::new("c", Role::Key),
            Seg::new("Copy Email", Role::Text),
        ],
        inner_w,
    ));
    let title = if profile.role.is_empty() {
        profile.name.clone()
    } else {
        format!("{} \u{00B7} {}", profile.name, profile.role)
    };
    boxed(&title, content, width)
}

fn highlight_rows(width: usize) -> Vec<Row> {
    let inner_w = inner(width);
    let mut content = wrap_rows(
        "Practical features, clean structure, and strong UX.",
        Role::Dim,
        inner_w,
    );
    for (name, desc) in HIGHLIGHTS {
        content.push(Vec::new());
        content.push(vec![Seg::new(truncate_to_width(name, inner_w), Role::Title)]);
        content.extend(wrap_rows(desc, Role::Text, inner_w));
    }
    boxed("What I ship", content, width)
}

fn reach_rows(catalog: &Catalog, width: usize) -> Vec<Row> {
    let inner_w = inner(width);
    let profile = catalog.profile();
    let mut content = wrap_rows(
        "Email is the fastest. Message me for a quick walkthrough of any project and I'll send a clean summary.",
        Role::Text,
        inner_w,
    );
    if !profile.email.is_empty() {
        content.extend(flow(
            vec![
                Seg::new(format!("\u{2709} {}", profile.email), Role::Link),
                Seg::new("c", Role::Key),
                Seg::new("Copy Email", Role::Text),
            ],
            inner_w,
        ));
    }
    boxed("Reach me", content, width)
}

fn profile_rows(catalog: &Catalog, width: usize) -> Vec<Row> {
    let inner_w = inner(width);
    let mut content = wrap_rows(
        "Check out some of my work, or connect with me through:",
        Role::Text,
        inner_w,
    );
    for link in &catalog.profile().links {
        content.push(vec![Seg::new(
            truncate_to_width(&format!("\u{2197} {}", link.label), inner_w),
            Role::Link,
        )]);
    }
    boxed("Profiles", content, width)
}
