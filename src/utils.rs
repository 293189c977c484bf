use crate::config::Config;

/// Callback URL handed to Med42 when the caller did not supply one.
pub fn default_webhook_url(cfg: &Config, host: Option<&str>) -> String {
    if let Some(base) = &cfg.public_base_url {
        if let Ok(url) = base.join("webhook") {
            return url.to_string();
        }
    }
    match host.filter(|h| !h.is_empty()) {
        Some(host) => format!("http://{host}/webhook"),
        None => format!("http://{}/webhook", cfg.bind_addr()),
    }
}

/// First `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn cfg() -> Config {
        Config::with_api_url(Url::parse("http://med42.test/v1").unwrap())
    }

    #[test]
    fn prefers_public_base_url() {
        let mut cfg = cfg();
        cfg.public_base_url = Some(Url::parse("https://gw.example/api/").unwrap());
        assert_eq!(
            default_webhook_url(&cfg, Some("internal:5000")),
            "https://gw.example/api/webhook"
        );
    }

    #[test]
    fn falls_back_to_host_then_bind_addr() {
        let cfg = cfg();
        assert_eq!(
            default_webhook_url(&cfg, Some("gw.local:8080")),
            "http://gw.local:8080/webhook"
        );
        assert_eq!(default_webhook_url(&cfg, None), "http://0.0.0.0:5000/webhook");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 100), "ab");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
