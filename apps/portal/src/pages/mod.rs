//! Page renderers. Each page is an askama template; data is fetched from the
//! gateways right before rendering, every time.

use askama::Template;
use uuid::Uuid;

use crate::admin::dashboard::load_dashboard;
use crate::applications::form::{
    COUNTRIES, EDUCATION_LEVELS, ETHNICITIES, GENDERS, PREFIXES, REFERRAL_SOURCES, SUFFIXES,
};
use crate::errors::AppError;
use crate::fragment::{Page, Route};
use crate::models::job::JobRow;
use crate::session::SessionState;
use crate::state::AppState;

pub mod listing;

use listing::{filter_and_sort, SortKey};

/// Header navigation, rendered on every page.
pub struct NavBar {
    pub active: &'static str,
    pub signed_in: bool,
    pub email: String,
    pub admin: bool,
}

impl NavBar {
    pub fn new(route: Route, session: &SessionState) -> Self {
        NavBar {
            active: route.nav_tab(),
            signed_in: session.signed_in(),
            email: session
                .user
                .as_ref()
                .map(|u| u.email.clone())
                .unwrap_or_default(),
            admin: session.admin,
        }
    }

    pub fn class(&self, tab: &str) -> &'static str {
        if self.active == tab {
            "nav-link active"
        } else {
            "nav-link"
        }
    }
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        SelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Options whose value and label are the same text.
pub fn plain_options(values: &[&str]) -> Vec<SelectOption> {
    values
        .iter()
        .map(|value| SelectOption::new(value, value, false))
        .collect()
}

/// Display form of a posting. Missing optional fields become empty strings.
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub required_qualifications: String,
    pub recommended_qualifications: String,
    pub salary_range: String,
    pub location: String,
    pub work_type: String,
    pub posted: String,
}

impl From<&JobRow> for JobCard {
    fn from(job: &JobRow) -> Self {
        JobCard {
            id: job.id.to_string(),
            title: job.title.clone(),
            description: job.description.clone(),
            required_qualifications: job.required_qualifications.clone(),
            recommended_qualifications: job.recommended_qualifications.clone().unwrap_or_default(),
            salary_range: job.salary_range.clone().unwrap_or_default(),
            location: job.location.clone().unwrap_or_default(),
            work_type: job.work_type.clone().unwrap_or_default(),
            posted: job.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub nav: NavBar,
}

#[derive(Template)]
#[template(path = "why_hera.html")]
pub struct WhyHeraPage {
    pub nav: NavBar,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub nav: NavBar,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub nav: NavBar,
}

#[derive(Template)]
#[template(path = "login_prompt.html")]
pub struct LoginPromptPage {
    pub nav: NavBar,
    pub heading: &'static str,
    pub message: &'static str,
}

impl LoginPromptPage {
    fn new(nav: NavBar, requested: Route) -> Self {
        let message = match requested {
            Route::Apply(_) => "You must be logged in to apply for a position.",
            _ => "You must be logged in to access job postings.",
        };
        LoginPromptPage {
            nav,
            heading: "Login Required",
            message,
        }
    }
}

#[derive(Template)]
#[template(path = "job_listings.html")]
pub struct JobListingsPartial {
    pub jobs: Vec<JobCard>,
}

impl JobListingsPartial {
    pub fn new(jobs: &[JobRow]) -> Self {
        JobListingsPartial {
            jobs: jobs.iter().map(JobCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsPage {
    pub nav: NavBar,
    pub sort_options: Vec<SelectOption>,
    pub jobs: Vec<JobCard>,
}

impl JobsPage {
    fn new(nav: NavBar, jobs: &[JobRow], sort: SortKey) -> Self {
        JobsPage {
            nav,
            sort_options: SortKey::ALL
                .iter()
                .map(|key| SelectOption::new(key.as_str(), key.label(), *key == sort))
                .collect(),
            jobs: jobs.iter().map(JobCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "apply.html")]
pub struct ApplyPage {
    pub nav: NavBar,
    pub job_id: String,
    pub job_title: String,
    pub prefixes: Vec<SelectOption>,
    pub suffixes: Vec<SelectOption>,
    pub countries: Vec<SelectOption>,
    pub education_levels: Vec<SelectOption>,
    pub referral_sources: Vec<SelectOption>,
    pub genders: Vec<SelectOption>,
    pub ethnicities: Vec<SelectOption>,
}

impl ApplyPage {
    fn new(nav: NavBar, job_id: Uuid, job: Option<&JobRow>) -> Self {
        ApplyPage {
            nav,
            job_id: job_id.to_string(),
            job_title: job
                .map(|j| j.title.clone())
                .unwrap_or_else(|| "(Unknown Job)".to_string()),
            prefixes: plain_options(PREFIXES),
            suffixes: plain_options(SUFFIXES),
            countries: plain_options(COUNTRIES),
            education_levels: plain_options(EDUCATION_LEVELS),
            referral_sources: REFERRAL_SOURCES
                .iter()
                .map(|(value, label)| SelectOption::new(value, label, false))
                .collect(),
            genders: plain_options(GENDERS),
            ethnicities: plain_options(ETHNICITIES),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_gate.html")]
pub struct AdminGatePage {
    pub nav: NavBar,
}

/// Renders the page for an already-resolved route.
pub async fn render_page(
    state: &AppState,
    session: &SessionState,
    route: Route,
    page: Page,
) -> Result<String, AppError> {
    let nav = NavBar::new(route, session);
    let html = match page {
        Page::Home => HomePage { nav }.render()?,
        Page::WhyHera => WhyHeraPage { nav }.render()?,
        Page::Login => LoginPage { nav }.render()?,
        Page::Register => RegisterPage { nav }.render()?,
        Page::LoginPrompt(requested) => LoginPromptPage::new(nav, requested).render()?,
        Page::AdminGate => AdminGatePage { nav }.render()?,
        Page::Jobs => {
            let sort = SortKey::default();
            let jobs = filter_and_sort(state.data.list_jobs().await?, "", sort);
            JobsPage::new(nav, &jobs, sort).render()?
        }
        Page::Apply(job_id) => {
            let job = state.data.get_job(job_id).await?;
            ApplyPage::new(nav, job_id, job.as_ref()).render()?
        }
        Page::AdminDashboard => load_dashboard(state.data.as_ref(), nav).await?.render()?,
    };
    Ok(html)
}
