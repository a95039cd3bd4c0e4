use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Lecture;

pub const LECTURES_PATH: &str = "/api/lectures";

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn to(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// A lecture plus its navigation links, HAL style: entity fields flattened
/// at the top level, links under `_links`.
#[derive(Debug, Serialize)]
pub struct LectureResource {
    #[serde(flatten)]
    pub lecture: Lecture,
    #[serde(rename = "_links")]
    pub links: BTreeMap<&'static str, Link>,
}

impl LectureResource {
    pub fn new(lecture: Lecture) -> Self {
        let self_href = format!("{LECTURES_PATH}/{}", lecture.id);
        let mut links = BTreeMap::new();
        links.insert("self", Link::to(self_href));
        Self { lecture, links }
    }

    pub fn self_href(&self) -> &str {
        &self.links["self"].href
    }

    pub fn with_query_link(mut self) -> Self {
        self.links.insert("query-lectures", Link::to(LECTURES_PATH));
        self
    }

    pub fn with_update_link(mut self) -> Self {
        let href = self.self_href().to_string();
        self.links.insert("update-lecture", Link::to(href));
        self
    }
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: i64,
}

#[derive(Debug, Serialize)]
struct EmbeddedLectures {
    lectures: Vec<LectureResource>,
}

/// Collection envelope: embedded resources, page metadata and collection
/// level navigation (self, first/last, next/prev where applicable).
#[derive(Debug, Serialize)]
pub struct PagedLectures {
    #[serde(rename = "_embedded")]
    embedded: EmbeddedLectures,
    #[serde(rename = "_links")]
    links: BTreeMap<&'static str, Link>,
    page: PageMeta,
}

impl PagedLectures {
    pub fn new(lectures: Vec<Lecture>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };

        let page_href = |n: i64| format!("{LECTURES_PATH}?page={n}&size={size}");
        let mut links = BTreeMap::new();
        links.insert("self", Link::to(page_href(page)));
        links.insert("first", Link::to(page_href(0)));
        links.insert("last", Link::to(page_href(total_pages.saturating_sub(1).max(0))));
        if page > 0 {
            links.insert("prev", Link::to(page_href(page - 1)));
        }
        if page.saturating_add(1) < total_pages {
            links.insert("next", Link::to(page_href(page + 1)));
        }

        Self {
            embedded: EmbeddedLectures {
                lectures: lectures.into_iter().map(LectureResource::new).collect(),
            },
            links,
            page: PageMeta { size, total_elements, total_pages, number: page },
        }
    }
}
