//! Compiled-in datasets and their dot layouts.
//!
//! - `creative_works()`: works per year and type, rolled up by (year, type),
//!   one dot per type per year (marks keyed by type)
//! - `personal_timeline()`: education and work milestones, one dot per
//!   entry (marks keyed by title), radius from description length

use super::dataset::Dataset;
use super::traits::Item;
use crate::render::Circle;
use crate::render::scale::{BandScale, LinearScale, SqrtScale};

/// Plot area of the works chart
const WORKS_SIZE: (f32, f32) = (580.0, 440.0);
/// Plot area of the timeline chart
const TIMELINE_SIZE: (f32, f32) = (780.0, 340.0);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreativeWork {
    pub year: i32,
    pub kind: String,
    pub count: u32,
}

impl Item for CreativeWork {
    type Key = i32;

    fn time_key(&self) -> i32 {
        self.year
    }

    fn identity(&self) -> String {
        self.kind.clone()
    }

    fn describe(&self) -> String {
        format!("{} {}: {}", self.year, self.kind, self.count)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub year: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub kind: String,
}

impl Milestone {
    /// Size driver used for the dot radius
    pub fn weight(&self) -> f32 {
        self.description.chars().count() as f32 / 10.0
    }
}

impl Item for Milestone {
    type Key = i32;

    fn time_key(&self) -> i32 {
        self.year
    }

    fn identity(&self) -> String {
        self.title.clone()
    }

    fn describe(&self) -> String {
        format!("{} [{}] {}", self.year, self.category, self.title)
    }
}

const WORKS: &[(i32, &str, u32)] = &[
    (2018, "Painting", 5),
    (2018, "Sculpture", 3),
    (2018, "Writing", 8),
    (2019, "Painting", 7),
    (2019, "Sculpture", 4),
    (2019, "Writing", 6),
    (2020, "Painting", 2),
    (2020, "Sculpture", 6),
    (2020, "Writing", 10),
    (2021, "Painting", 4),
    (2021, "Sculpture", 5),
    (2021, "Writing", 7),
    (2022, "Painting", 6),
    (2022, "Sculpture", 2),
    (2022, "Writing", 9),
];

const MILESTONES: &[(i32, &str, &str, &str, &str)] = &[
    (2013, "education", "Chong Gene Hang College", "Secondary Education (S1-S6)", "school"),
    (
        2019,
        "education",
        "DSE Examination",
        "5 passes including Chinese, English, Mathematics, Liberal Studies, Business, Accounting and Financial Studies",
        "exam",
    ),
    (
        2019,
        "education",
        "Community College of City University",
        "Associate of Science in Creative and Interactive Media Production",
        "college",
    ),
    (
        2021,
        "education",
        "City University of Hong Kong",
        "Bachelor of Science in Creative Media (BScCM)",
        "university",
    ),
    (2016, "work", "Panda Safari", "Hong Kong travel agent specializing in tour packages to Africa", "travel"),
    (2019, "work", "IKEA HK, DFI Retail Group", "Sales Co-Worker Market Hall", "retail"),
    (2019, "work", "Comme des Garçons", "Sales", "fashion"),
    (2019, "work", "NIKE Lab PS7", "Sales Co-Worker, Store Assistance", "sports"),
    (2019, "work", "Hoi Tin Athletic Association", "Assistance", "sports"),
    (2020, "work", "IKEA HK, DFI Retail Group", "Sales Co-Worker, Show Room", "retail"),
    (2022, "work", "IKEA HK, DFI Retail Group", "Store Operation Team Co-Worker", "retail"),
    (2023, "work", "Cathay Pacific Airways Limited", "Flight Attendant", "aviation"),
];

/// Creative works per (year, type), counts summed
pub fn creative_works() -> Dataset<CreativeWork> {
    let raw = WORKS
        .iter()
        .map(|&(year, kind, count)| CreativeWork {
            year,
            kind: kind.to_string(),
            count,
        })
        .collect();
    Dataset::rollup(raw, |w| (w.year, w.kind.clone()), |acc, w| acc.count += w.count)
}

/// Personal education and work timeline
pub fn personal_timeline() -> Dataset<Milestone> {
    Dataset::new(
        MILESTONES
            .iter()
            .map(|&(year, category, title, description, kind)| Milestone {
                year,
                category: category.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                kind: kind.to_string(),
            })
            .collect(),
    )
}

/// Dot layout for works: x band by year, y band by type, sqrt radius by count
pub fn works_layout(dataset: &Dataset<CreativeWork>) -> impl Fn(&CreativeWork) -> Circle + use<> {
    let (width, height) = WORKS_SIZE;
    let years: Vec<String> = dataset.time_keys().iter().map(i32::to_string).collect();
    let x = BandScale::new(years, (0.0, width), 0.1);
    let y = BandScale::new(dataset.identities(), (0.0, height), 0.2);
    let max_count = dataset.items().iter().map(|w| w.count).max().unwrap_or(0);
    let r = SqrtScale::new((0.0, max_count as f32), (5.0, 20.0));

    move |w: &CreativeWork| Circle {
        cx: x.center(&w.year.to_string()).unwrap_or_default(),
        cy: y.center(&w.kind).unwrap_or_default(),
        r: r.map(w.count as f32),
    }
}

/// Dot layout for milestones: linear x by year (padded one year each side),
/// y band by category, sqrt radius by description length
pub fn timeline_layout(dataset: &Dataset<Milestone>) -> impl Fn(&Milestone) -> Circle + use<> {
    let (width, height) = TIMELINE_SIZE;
    let keys = dataset.time_keys();
    let first = keys.first().copied().unwrap_or_default() as f32;
    let last = keys.last().copied().unwrap_or_default() as f32;
    let x = LinearScale::new((first - 1.0, last + 1.0), (0.0, width));

    let mut categories: Vec<String> = Vec::new();
    for m in dataset.items() {
        if !categories.contains(&m.category) {
            categories.push(m.category.clone());
        }
    }
    let y = BandScale::new(categories, (0.0, height), 0.2);
    let max_weight = dataset.items().iter().map(Milestone::weight).fold(0.0, f32::max);
    let r = SqrtScale::new((0.0, max_weight), (5.0, 15.0));

    move |m: &Milestone| Circle {
        cx: x.map(m.year as f32),
        cy: y.center(&m.category).unwrap_or_default(),
        r: r.map(m.weight()),
    }
}
