use schemars::JsonSchema;
use serde::Deserialize;
use tracing_appender::rolling::Rotation;

/// How often the log file is rolled over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogRotationKind {
    #[serde(alias = "Minutely", alias = "MINUTELY")]
    Minutely,
    #[serde(alias = "Hourly", alias = "HOURLY")]
    Hourly,
    #[serde(alias = "Daily", alias = "DAILY")]
    Daily,
    #[serde(alias = "Never", alias = "NEVER")]
    Never,
}

impl From<LogRotationKind> for Rotation {
    fn from(value: LogRotationKind) -> Self {
        match value {
            LogRotationKind::Minutely => Rotation::MINUTELY,
            LogRotationKind::Hourly => Rotation::HOURLY,
            LogRotationKind::Daily => Rotation::DAILY,
            LogRotationKind::Never => Rotation::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogRotationKind;
    use rstest::rstest;
    use tracing_appender::rolling::Rotation;

    #[rstest]
    #[case(LogRotationKind::Minutely, Rotation::MINUTELY)]
    #[case(LogRotationKind::Hourly, Rotation::HOURLY)]
    #[case(LogRotationKind::Daily, Rotation::DAILY)]
    #[case(LogRotationKind::Never, Rotation::NEVER)]
    fn it_maps_to_rotation_correctly(
        #[case] log_rotation_kind: LogRotationKind,
        #[case] expected: Rotation,
    ) {
        let actual: Rotation = log_rotation_kind.into();
        assert_eq!(expected, actual);
    }

    #[rstest]
    #[case("\"daily\"")]
    #[case("\"Daily\"")]
    #[case("\"DAILY\"")]
    fn it_accepts_any_common_casing(#[case] json: &str) {
        assert_eq!(
            serde_json::from_str::<LogRotationKind>(json).unwrap(),
            LogRotationKind::Daily
        );
    }
}
