use crate::config::ClientConfig;
use detection_api_caller::json::detection::DetectionResult;

/// `1 person`, otherwise `N people`
#[must_use]
pub fn people_label(num_people: u32) -> String {
    if num_people == 1 {
        "1 person".to_string()
    } else {
        format!("{num_people} people")
    }
}

#[must_use]
pub fn result_image_url(config: &ClientConfig, result: &DetectionResult) -> String {
    config.resource_url(&result.result_image_path)
}

/// Renders nothing without a result
#[must_use]
pub fn render_result(config: &ClientConfig, result: Option<&DetectionResult>) -> Option<String> {
    let result = result?;

    let lines = [
        "Detection Results".to_string(),
        "  Detection Summary".to_string(),
        format!("    {} detected", people_label(result.num_people)),
        format!("    Confidence threshold: {}", result.confidence_threshold),
        format!(
            "    Processed on: {}",
            utils::time::format_long(&result.timestamp)
        ),
        "  Detection Result".to_string(),
        format!("    {}", result_image_url(config, result)),
    ];

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_detection;
    use rstest::rstest;
    use test_utils::asserts::{assert_has_line, assert_str_not_contains};

    #[rstest]
    #[case(0, "0 people")]
    #[case(1, "1 person")]
    #[case(2, "2 people")]
    #[case(117, "117 people")]
    fn pluralization(#[case] n: u32, #[case] expected: &str) {
        assert_eq!(people_label(n), expected);
    }

    #[test]
    fn nothing_to_render() {
        let config = ClientConfig::resolve(|_| None);
        assert_eq!(render_result(&config, None), None);
    }

    #[test]
    fn image_url() {
        let config = ClientConfig::resolve(|_| None);
        let mut result = make_detection(42, 1);

        result.result_image_path = "results/42.jpg".to_string();
        assert_eq!(
            result_image_url(&config, &result),
            "http://localhost/api/results/42.jpg"
        );

        result.result_image_path = "/results/42.jpg".to_string();
        assert_eq!(
            result_image_url(&config, &result),
            "http://localhost/api/results/42.jpg"
        );
    }

    #[test]
    fn full_render() {
        let config = ClientConfig::resolve(|name| {
            (name == crate::config::API_URL_ENV_VAR).then(|| "https://detect.example.com/api/".to_string())
        });
        let mut result = make_detection(7, 1);
        result.confidence_threshold = 0.4;

        let rendered = render_result(&config, Some(&result)).unwrap();
        assert_has_line(&rendered, "Detection Results");
        assert_has_line(&rendered, "1 person detected");
        assert_has_line(&rendered, "Confidence threshold: 0.4");
        assert_has_line(&rendered, "Processed on: 2024-05-01 10:20:30");
        assert_has_line(&rendered, "https://detect.example.com/api/results/7.jpg");
        assert_str_not_contains(&rendered, "api//results");
    }
}
