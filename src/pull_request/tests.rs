use mockall::predicate::eq;

use super::*;
use crate::{
    ecosystem::types::DependencyFile,
    forge::{
        config::RemoteConfig,
        request::{Commit, FileChangeType},
        traits::MockForge,
    },
    test_helpers::*,
};

fn mock_forge() -> MockForge {
    let mut forge = MockForge::new();
    forge
        .expect_remote_config()
        .returning(create_test_remote_config);
    forge
        .expect_default_branch()
        .returning(|| "main".to_string());
    forge
}

fn creator(forge: MockForge) -> ForgePullRequestCreator {
    ForgePullRequestCreator::new(
        ForgeManager::new(Box::new(forge)),
        create_test_source(),
        PackageManager::Bundler,
    )
}

fn request(assignee: Option<u64>) -> PullRequestRequest {
    PullRequestRequest {
        base_commit: "abc123".into(),
        base_files: create_test_files(),
        dependencies: vec![create_test_updated_dependency("foo", "1.0", "1.1")],
        files: create_test_files(),
        assignee,
        label_language: true,
    }
}

#[tokio::test]
async fn creates_branch_pr_labels_and_assignee() {
    let mut forge = mock_forge();
    forge
        .expect_find_open_pr()
        .with(eq(GetPrRequest {
            head_branch: "bumpkin/bundler/foo-1.1".into(),
            base_branch: "main".into(),
        }))
        .times(1)
        .returning(|_| Ok(None));
    forge
        .expect_create_branch()
        .withf(|req| {
            req.branch == "bumpkin/bundler/foo-1.1"
                && req.base_commit == "abc123"
                && req.message == "Bump foo from 1.0 to 1.1"
                && req.file_changes.len() == 2
                && req.file_changes[0].path == "Gemfile"
        })
        .times(1)
        .returning(|_| Ok(Commit { sha: "def456".into() }));
    forge
        .expect_create_pr()
        .withf(|req| {
            req.title == "Bump foo from 1.0 to 1.1"
                && req.head_branch == "bumpkin/bundler/foo-1.1"
                && req.base_branch == "main"
                && req.body.contains("Bumps `foo`")
        })
        .times(1)
        .returning(|_| {
            Ok(PullRequest {
                number: 5,
                url: None,
            })
        });
    forge
        .expect_add_pr_labels()
        .with(eq(PrLabelsRequest {
            pr_number: 5,
            labels: vec!["dependencies".into(), "ruby".into()],
        }))
        .times(1)
        .returning(|_| Ok(()));
    forge
        .expect_add_pr_assignees()
        .with(eq(PrAssigneesRequest {
            pr_number: 5,
            assignees: vec![42],
        }))
        .times(1)
        .returning(|_| Ok(()));

    let pr = creator(forge).create(&request(Some(42))).await.unwrap();

    assert_eq!(pr.unwrap().number, 5);
}

#[tokio::test]
async fn declines_when_pr_already_open() {
    let mut forge = mock_forge();
    forge.expect_find_open_pr().times(1).returning(|_| {
        Ok(Some(PullRequest {
            number: 3,
            url: None,
        }))
    });
    forge.expect_create_branch().never();
    forge.expect_create_pr().never();
    forge.expect_add_pr_labels().never();
    forge.expect_add_pr_assignees().never();

    let pr = creator(forge).create(&request(Some(42))).await.unwrap();

    assert!(pr.is_none());
}

#[tokio::test]
async fn skips_assignee_and_language_label_when_not_requested() {
    let mut forge = mock_forge();
    forge.expect_find_open_pr().returning(|_| Ok(None));
    forge
        .expect_create_branch()
        .returning(|_| Ok(Commit { sha: "def456".into() }));
    forge.expect_create_pr().returning(|_| {
        Ok(PullRequest {
            number: 9,
            url: None,
        })
    });
    forge
        .expect_add_pr_labels()
        .withf(|req| req.labels == vec!["dependencies".to_string()])
        .times(1)
        .returning(|_| Ok(()));
    forge.expect_add_pr_assignees().never();

    let mut req = request(None);
    req.label_language = false;

    let pr = creator(forge).create(&req).await.unwrap();

    assert_eq!(pr.unwrap().number, 9);
}

#[tokio::test]
async fn targets_configured_branch_and_directory() {
    let mut forge = mock_forge();
    forge
        .expect_find_open_pr()
        .with(eq(GetPrRequest {
            head_branch: "bumpkin/bundler/api/foo-1.1".into(),
            base_branch: "develop".into(),
        }))
        .times(1)
        .returning(|_| Ok(None));
    forge
        .expect_create_branch()
        .returning(|_| Ok(Commit { sha: "def456".into() }));
    forge
        .expect_create_pr()
        .withf(|req| {
            req.base_branch == "develop"
                && req.title == "Bump foo from 1.0 to 1.1 in /api"
        })
        .times(1)
        .returning(|_| {
            Ok(PullRequest {
                number: 1,
                url: None,
            })
        });
    forge.expect_add_pr_labels().returning(|_| Ok(()));

    let mut source = create_test_source();
    source.directory = "/api".into();
    source.branch = Some("develop".into());

    let creator = ForgePullRequestCreator::new(
        ForgeManager::new(Box::new(forge)),
        source,
        PackageManager::Bundler,
    );

    creator.create(&request(None)).await.unwrap();
}

#[tokio::test]
async fn dry_run_reports_placeholder_pr_without_writes() {
    let mut forge = MockForge::new();
    forge.expect_remote_config().returning(|| RemoteConfig {
        dry_run: true,
        ..create_test_remote_config()
    });
    forge
        .expect_default_branch()
        .returning(|| "main".to_string());
    forge.expect_find_open_pr().returning(|_| Ok(None));
    forge.expect_create_branch().never();
    forge.expect_create_pr().never();
    forge.expect_add_pr_labels().never();
    forge.expect_add_pr_assignees().never();

    let pr = creator(forge).create(&request(Some(1))).await.unwrap();

    assert_eq!(pr.unwrap().number, 0);
}

#[tokio::test]
async fn commits_generated_files_as_new_files() {
    let mut forge = mock_forge();
    forge.expect_find_open_pr().returning(|_| Ok(None));
    forge
        .expect_create_branch()
        .withf(|req| {
            let types: Vec<(&str, FileChangeType)> = req
                .file_changes
                .iter()
                .map(|c| (c.path.as_str(), c.change_type))
                .collect();
            types
                == vec![
                    ("Gemfile", FileChangeType::Update),
                    ("Gemfile.lock", FileChangeType::Create),
                ]
        })
        .times(1)
        .returning(|_| Ok(Commit { sha: "def456".into() }));
    forge.expect_create_pr().returning(|_| {
        Ok(PullRequest {
            number: 2,
            url: None,
        })
    });
    forge.expect_add_pr_labels().returning(|_| Ok(()));

    let mut req = request(None);
    req.base_files = FileSet::new(vec![DependencyFile::new(
        "/",
        "Gemfile",
        "gem \"foo\", \"~> 1.0\"\n",
    )]);

    let pr = creator(forge).create(&req).await.unwrap();

    assert_eq!(pr.unwrap().number, 2);
}
