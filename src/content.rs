//! Blog category presentation
//!
//! Maps a post's category label to the icon and fallback cover image used
//! by the blog listing. Unknown labels fall back to [`BlogCategory::General`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlogCategory {
    LifeInsurance,
    TermLife,
    WholeLife,
    Health,
    Retirement,
    Family,
    Finance,
    General,
}

impl BlogCategory {
    pub const ALL: [BlogCategory; 8] = [
        BlogCategory::LifeInsurance,
        BlogCategory::TermLife,
        BlogCategory::WholeLife,
        BlogCategory::Health,
        BlogCategory::Retirement,
        BlogCategory::Family,
        BlogCategory::Finance,
        BlogCategory::General,
    ];

    /// Case-insensitive lookup by display label
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(BlogCategory::General)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlogCategory::LifeInsurance => "Life Insurance",
            BlogCategory::TermLife => "Term Life",
            BlogCategory::WholeLife => "Whole Life",
            BlogCategory::Health => "Health",
            BlogCategory::Retirement => "Retirement",
            BlogCategory::Family => "Family",
            BlogCategory::Finance => "Finance",
            BlogCategory::General => "General",
        }
    }

    /// Icon name in the site's icon set
    pub fn icon(&self) -> &'static str {
        match self {
            BlogCategory::LifeInsurance => "shield",
            BlogCategory::TermLife => "clock",
            BlogCategory::WholeLife => "infinity",
            BlogCategory::Health => "heart-pulse",
            BlogCategory::Retirement => "sunset",
            BlogCategory::Family => "users",
            BlogCategory::Finance => "piggy-bank",
            BlogCategory::General => "book-open",
        }
    }

    /// Cover image used when a post has none
    pub fn fallback_image(&self) -> &'static str {
        match self {
            BlogCategory::LifeInsurance => "/images/blog/life-insurance.jpg",
            BlogCategory::TermLife => "/images/blog/term-life.jpg",
            BlogCategory::WholeLife => "/images/blog/whole-life.jpg",
            BlogCategory::Health => "/images/blog/health.jpg",
            BlogCategory::Retirement => "/images/blog/retirement.jpg",
            BlogCategory::Family => "/images/blog/family.jpg",
            BlogCategory::Finance => "/images/blog/finance.jpg",
            BlogCategory::General => "/images/blog/general.jpg",
        }
    }
}

pub fn category_icon(label: &str) -> &'static str {
    BlogCategory::from_label(label).icon()
}

pub fn category_image(label: &str) -> &'static str {
    BlogCategory::from_label(label).fallback_image()
}
