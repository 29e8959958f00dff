// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use pretty_assertions::assert_eq;
use pyunit_metadata::TestStatus;
use pyunit_runner::{
    cancel::CancellationToken,
    discover::TestDiscoverer,
    list::{ListShape, OutputFormat, SerializableFormat},
    user_config::DiscoveryConfig,
};

#[tokio::test]
async fn test_discover_fixture() -> Result<()> {
    let discoverer = TestDiscoverer::new("/project", &[] as &[&str], &DiscoveryConfig::default());
    let test_list = discoverer
        .discover(
            &CannedRunner {
                output: FIXTURE_OUTPUT,
            },
            &CancellationToken::new(),
        )
        .await?;

    assert_eq!(test_list.tests_dir(), "/project");
    assert_eq!(test_list.file_count(), 2);
    assert_eq!(test_list.suite_count(), 3);
    assert_eq!(test_list.test_count(), 5);

    let math = test_list
        .get("/project/tests/test_math.py")
        .expect("test_math.py was discovered");
    assert_eq!(math.name, "test_math.py");
    assert_eq!(math.name_to_run, "TestAdd.test_positive");
    let suites: Vec<_> = math
        .suites
        .iter()
        .map(|suite| (suite.name.as_str(), suite.functions.len()))
        .collect();
    assert_eq!(suites, [("TestAdd", 2), ("TestSub", 1)]);

    for instance in test_list.iter_tests() {
        ensure!(
            instance.function.status == TestStatus::Idle,
            "{} starts out idle",
            instance.function.name_to_run
        );
        let suite = instance.suite.expect("unittest functions are in suites");
        ensure!(suite.is_unit_test && !suite.is_instance, "suite flags");
    }

    let flattened = test_list.flatten();
    let folders: Vec<_> = flattened
        .test_folders
        .iter()
        .map(|folder| folder.name.as_str())
        .collect();
    assert_eq!(folders, [".", "tests", "tests/io"]);
    assert_eq!(flattened.root_test_folders, ["/project"]);

    Ok(())
}

#[tokio::test]
async fn test_json_output_round_trips() -> Result<()> {
    let discoverer = TestDiscoverer::new(
        "/project",
        &["-s", "tests", "-p", "test_*.py"],
        &DiscoveryConfig::default(),
    );
    let test_list = discoverer
        .discover(
            &CannedRunner {
                output: "start\nio.test_files.TestRead.test_empty\n",
            },
            &CancellationToken::new(),
        )
        .await?;

    let json = test_list.to_string(
        OutputFormat::Serializable(SerializableFormat::JsonPretty),
        ListShape::Tree,
    )?;
    let summary: pyunit_metadata::TestListSummary = serde_json::from_str(&json)?;
    assert_eq!(summary, test_list.to_summary());
    assert_eq!(
        summary.test_files[0].full_path,
        "/project/tests/io/test_files.py"
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_discover_with_process() -> Result<()> {
    use pyunit_runner::test_command::ProcessRunner;

    let temp_dir = camino_tempfile::tempdir()?;
    let fake_python = write_fake_python(temp_dir.path(), FIXTURE_OUTPUT)?;
    let config = DiscoveryConfig::default().with_python_override(Some(fake_python.into_string()));

    let discoverer = TestDiscoverer::new(temp_dir.path(), &[] as &[&str], &config);
    let test_list = discoverer
        .discover(&ProcessRunner, &CancellationToken::new())
        .await?;

    assert_eq!(test_list.test_count(), 5);
    let expected_path = temp_dir.path().join("tests/io/test_files.py");
    ensure!(
        test_list.get(&expected_path).is_some(),
        "{expected_path} was discovered"
    );
    Ok(())
}
