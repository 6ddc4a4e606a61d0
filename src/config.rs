#[derive(Debug, Clone)]
pub struct Config {
    pub lesson_api_url: String,
    pub lesson_api_token: String,
    pub db_connection_string: String,
    pub bind_addr: String,
    pub seed_demo_courses: bool,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://course_shelf.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4100";

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lesson_api_url = lookup("LESSON_API_URL").unwrap_or_default();
        let lesson_api_token = lookup("LESSON_API_TOKEN").unwrap_or_default();
        let db_connection_string =
            lookup("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let bind_addr = lookup("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let seed_demo_courses = lookup("SEED_DEMO_COURSES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Config {
            lesson_api_url,
            lesson_api_token,
            db_connection_string,
            bind_addr,
            seed_demo_courses,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.lesson_api_url.is_empty() {
            return Err("LESSON_API_URL is missing".into());
        }
        if !self.lesson_api_url.starts_with("http://") && !self.lesson_api_url.starts_with("https://")
        {
            return Err(format!(
                "LESSON_API_URL must be an http(s) URL, got {}",
                self.lesson_api_url
            ));
        }
        Ok(())
    }
}
