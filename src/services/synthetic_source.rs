//! Deterministic job generator used when no LLM key is configured.
//!
//! Output depends only on the criteria, so demos and tests see the same
//! listings for the same search. Postings go through the normal
//! normalization path like any other source.

use async_trait::async_trait;
use serde_json::json;

use super::job_source::{JobSource, JobSourceError, RawJobResponse, SearchCriteria, MAX_REQUESTED_JOBS};

struct CompanyPages {
    name: &'static str,
    career_url: &'static str,
    apply_base: &'static str,
}

const COMPANIES: &[CompanyPages] = &[
    CompanyPages { name: "Google", career_url: "https://careers.google.com", apply_base: "https://careers.google.com/jobs/results" },
    CompanyPages { name: "Microsoft", career_url: "https://careers.microsoft.com", apply_base: "https://careers.microsoft.com/us/en/search-results" },
    CompanyPages { name: "Apple", career_url: "https://jobs.apple.com", apply_base: "https://jobs.apple.com/en-us/search" },
    CompanyPages { name: "Amazon", career_url: "https://www.amazon.jobs", apply_base: "https://www.amazon.jobs/en/search" },
    CompanyPages { name: "Meta", career_url: "https://careers.meta.com", apply_base: "https://careers.meta.com/jobs" },
    CompanyPages { name: "Netflix", career_url: "https://jobs.netflix.com", apply_base: "https://jobs.netflix.com/jobs" },
    CompanyPages { name: "Uber", career_url: "https://www.uber.com/careers", apply_base: "https://www.uber.com/careers/list" },
    CompanyPages { name: "Airbnb", career_url: "https://careers.airbnb.com", apply_base: "https://careers.airbnb.com/positions" },
    CompanyPages { name: "LinkedIn", career_url: "https://careers.linkedin.com", apply_base: "https://careers.linkedin.com/jobs" },
    CompanyPages { name: "Salesforce", career_url: "https://salesforce.wd1.myworkdayjobs.com", apply_base: "https://salesforce.wd1.myworkdayjobs.com/en-US/External_Career_Site" },
    CompanyPages { name: "Adobe", career_url: "https://careers.adobe.com", apply_base: "https://careers.adobe.com/us/en/search-results" },
    CompanyPages { name: "Oracle", career_url: "https://careers.oracle.com", apply_base: "https://careers.oracle.com/jobs" },
    CompanyPages { name: "IBM", career_url: "https://careers.ibm.com", apply_base: "https://careers.ibm.com/job-search" },
    CompanyPages { name: "Intel", career_url: "https://jobs.intel.com", apply_base: "https://jobs.intel.com/en/search-jobs" },
    CompanyPages { name: "NVIDIA", career_url: "https://nvidia.wd5.myworkdayjobs.com", apply_base: "https://nvidia.wd5.myworkdayjobs.com/en-US/NVIDIAExternalCareerSite" },
    CompanyPages { name: "Cisco", career_url: "https://jobs.cisco.com", apply_base: "https://jobs.cisco.com/jobs/SearchJobs" },
    CompanyPages { name: "Spotify", career_url: "https://jobs.spotify.com", apply_base: "https://jobs.spotify.com" },
    CompanyPages { name: "Stripe", career_url: "https://stripe.com/jobs", apply_base: "https://stripe.com/jobs/search" },
    CompanyPages { name: "Databricks", career_url: "https://databricks.com/company/careers", apply_base: "https://databricks.com/company/careers/open-positions" },
    CompanyPages { name: "Snowflake", career_url: "https://careers.snowflake.com", apply_base: "https://careers.snowflake.com/us/en/search-results" },
    CompanyPages { name: "MongoDB", career_url: "https://www.mongodb.com/careers", apply_base: "https://www.mongodb.com/careers/jobs" },
];

const ROLE_FAMILIES: &[(&str, &[&str])] = &[
    (
        "software engineer",
        &[
            "Software Engineer", "Full Stack Developer", "Backend Engineer", "Frontend Engineer",
            "Software Developer", "Application Developer", "Systems Engineer", "DevOps Engineer",
        ],
    ),
    (
        "data scientist",
        &[
            "Data Scientist", "Machine Learning Engineer", "AI Engineer", "Data Analyst",
            "ML Engineer", "Research Scientist", "Data Engineer", "Analytics Engineer",
        ],
    ),
    (
        "product manager",
        &[
            "Product Manager", "Senior Product Manager", "Technical Product Manager",
            "Product Owner", "Associate Product Manager", "Product Lead",
        ],
    ),
    (
        "devops",
        &[
            "DevOps Engineer", "Site Reliability Engineer", "Platform Engineer",
            "Infrastructure Engineer", "Cloud Engineer", "Systems Administrator",
        ],
    ),
    (
        "designer",
        &[
            "UX Designer", "UI Designer", "Product Designer", "Visual Designer",
            "Interaction Designer", "User Experience Designer", "Creative Designer",
        ],
    ),
];

const TITLE_PREFIXES: [&str; 4] = ["", "Senior ", "Lead ", "Principal "];
const TITLE_SUFFIXES: [&str; 4] = ["", " Engineer", " Developer", " Specialist"];
const JOB_TYPES: [&str; 5] = ["Full-time", "Full-time", "Full-time", "Contract", "Remote"];

#[derive(Clone, Default)]
pub struct SyntheticJobSource;

impl SyntheticJobSource {
    pub fn new() -> Self {
        Self
    }

    fn ordered_companies(preferred: &[String]) -> Vec<&'static CompanyPages> {
        let mut companies: Vec<&'static CompanyPages> = COMPANIES.iter().collect();
        for name in preferred.iter().rev() {
            if let Some(pos) = companies.iter().position(|c| c.name == name.as_str()) {
                let company = companies.remove(pos);
                companies.insert(0, company);
            }
        }
        companies
    }

    fn title_variant(job_title: &str, i: usize) -> String {
        let key = job_title.to_lowercase();
        match ROLE_FAMILIES.iter().find(|(family, _)| *family == key) {
            Some((_, variants)) => variants[i % variants.len()].to_string(),
            None => format!(
                "{}{}{}",
                TITLE_PREFIXES[i % TITLE_PREFIXES.len()],
                job_title,
                TITLE_SUFFIXES[i % TITLE_SUFFIXES.len()]
            ),
        }
    }

    fn description(company: &str, title: &str, i: usize) -> String {
        match i % 5 {
            0 => format!("Join {company} as a {title} and help us build innovative solutions that impact millions of users worldwide. You'll work with cutting-edge technologies and collaborate with talented teams to deliver exceptional products."),
            1 => format!("{company} is seeking a passionate {title} to join our growing team. You'll be responsible for developing scalable solutions, optimizing performance, and contributing to our mission of transforming the industry."),
            2 => format!("We're looking for a talented {title} at {company} to help us scale our platform and deliver outstanding user experiences. You'll work on challenging problems and have the opportunity to make a significant impact."),
            3 => format!("At {company}, we're building the future, and we need a skilled {title} to join our mission. You'll collaborate with cross-functional teams, drive technical excellence, and help shape our product strategy."),
            _ => format!("Help {company} revolutionize the industry as a {title}. You'll work with the latest technologies, solve complex problems, and be part of a team that values innovation and creativity."),
        }
    }

    fn salary_range(title: &str, i: usize) -> &'static str {
        let bands: [&str; 3] = if title.contains("Principal") {
            ["$180,000 - $250,000", "$200,000 - $280,000", "$220,000 - $300,000"]
        } else if title.contains("Senior") || title.contains("Lead") {
            ["$120,000 - $180,000", "$140,000 - $200,000", "$160,000 - $220,000"]
        } else {
            ["$80,000 - $120,000", "$90,000 - $140,000", "$100,000 - $150,000"]
        };
        bands[i % bands.len()]
    }

    fn experience_level(title: &str, i: usize) -> &'static str {
        let levels: [&str; 3] = if title.contains("Senior") {
            ["Senior", "Senior", "Lead"]
        } else if title.contains("Lead") {
            ["Lead", "Senior", "Principal"]
        } else if title.contains("Principal") {
            ["Principal", "Senior", "Lead"]
        } else {
            ["Entry-level", "Mid-level", "Senior"]
        };
        levels[i % levels.len()]
    }

    pub fn generate(&self, criteria: &SearchCriteria) -> Vec<serde_json::Value> {
        let companies = Self::ordered_companies(&criteria.preferred_companies);

        (0..MAX_REQUESTED_JOBS)
            .map(|i| {
                let company = companies[i % companies.len()];
                let title = Self::title_variant(&criteria.job_title, i);
                let job_id = format!("job-{:03}", i + 1);
                let description = Self::description(company.name, &title, i);
                let salary_range = Self::salary_range(&title, i);
                let experience_level = Self::experience_level(&title, i);

                json!({
                    "title": title,
                    "company": company.name,
                    "location": criteria.location,
                    "description": description,
                    "url": format!("{}/{}", company.career_url, job_id),
                    "application_url": format!("{}/{}", company.apply_base, job_id),
                    "salary_range": salary_range,
                    "job_type": JOB_TYPES[i % JOB_TYPES.len()],
                    "experience_level": experience_level,
                    "posted_date": format!("2024-{:02}-{:02}", 12 - (i % 12), 15 - (i % 15)),
                })
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for SyntheticJobSource {
    async fn search(&self, criteria: &SearchCriteria) -> Result<RawJobResponse, JobSourceError> {
        Ok(RawJobResponse::StructuredList(self.generate(criteria)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(title: &str, companies: &[&str]) -> SearchCriteria {
        SearchCriteria {
            job_title: title.into(),
            location: "Remote".into(),
            preferred_companies: companies.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn generates_twenty_postings_deterministically() {
        let source = SyntheticJobSource::new();
        let first = source.generate(&criteria("Data Scientist", &[]));
        let second = source.generate(&criteria("Data Scientist", &[]));

        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
        assert_eq!(first[0]["title"], "Data Scientist");
        assert_eq!(first[1]["title"], "Machine Learning Engineer");
        assert_eq!(first[0]["location"], "Remote");
    }

    #[test]
    fn preferred_companies_come_first_in_given_order() {
        let source = SyntheticJobSource::new();
        let jobs = source.generate(&criteria("Engineer", &["Stripe", "Unknown Co", "Netflix"]));

        assert_eq!(jobs[0]["company"], "Stripe");
        assert_eq!(jobs[1]["company"], "Netflix");
        assert_eq!(jobs[2]["company"], "Google");
    }

    #[test]
    fn custom_titles_are_decorated() {
        let source = SyntheticJobSource::new();
        let jobs = source.generate(&criteria("Rust", &[]));

        assert_eq!(jobs[0]["title"], "Rust");
        assert_eq!(jobs[1]["title"], "Senior Rust Engineer");
        assert_eq!(jobs[3]["title"], "Principal Rust Specialist");
        assert_eq!(jobs[1]["salary_range"], "$140,000 - $200,000");
        assert_eq!(jobs[3]["experience_level"], "Principal");
    }

    #[test]
    fn posted_dates_are_valid_calendar_dates() {
        let source = SyntheticJobSource::new();
        for job in source.generate(&criteria("Engineer", &[])) {
            let date = job["posted_date"].as_str().unwrap();
            assert!(chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(), "{date}");
        }
    }
}
