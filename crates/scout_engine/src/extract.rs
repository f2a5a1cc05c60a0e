use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::email::EmailValidator;

static EMAIL_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,63}\b").expect("candidate pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageExtract {
    pub title: Option<String>,
    pub email: Option<String>,
}

/// Collaborator contract for turning a response body into a title and an
/// optional validated email. Async because validation may hit the network.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, body: &str) -> PageExtract;
}

/// Default extractor: `<title>` text plus the first email candidate the
/// configured validator accepts, in document order.
pub struct TitleEmailExtractor {
    validator: Box<dyn EmailValidator>,
}

impl TitleEmailExtractor {
    pub fn new(validator: Box<dyn EmailValidator>) -> Self {
        Self { validator }
    }

    async fn first_valid_email(&self, body: &str) -> Option<String> {
        let candidates: Vec<String> = EMAIL_CANDIDATE
            .find_iter(body)
            .map(|found| found.as_str().to_string())
            .collect();
        for candidate in candidates {
            if self.validator.validate(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }
}

#[async_trait::async_trait]
impl Extractor for TitleEmailExtractor {
    async fn extract(&self, body: &str) -> PageExtract {
        let title = extract_title(body);
        let email = self.first_valid_email(body).await;
        PageExtract { title, email }
    }
}

// Kept synchronous so the parsed document is dropped before any await.
fn extract_title(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
