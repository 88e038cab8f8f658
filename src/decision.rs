//! Decides whether and how a dependency should be updated.
use log::*;

use crate::{
    Result,
    ecosystem::{
        traits::UpdateChecker,
        types::{Dependency, RequirementsToUnlock, UpdatedDependency},
    },
};

/// How far requirement constraints must be loosened for an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStrategy {
    None,
    Own,
    All,
    /// No unlock level makes the update feasible.
    Impossible,
}

impl UnlockStrategy {
    /// The checker argument for this strategy, `None` when impossible.
    pub fn requirements_to_unlock(&self) -> Option<RequirementsToUnlock> {
        match self {
            UnlockStrategy::None => Some(RequirementsToUnlock::None),
            UnlockStrategy::Own => Some(RequirementsToUnlock::Own),
            UnlockStrategy::All => Some(RequirementsToUnlock::All),
            UnlockStrategy::Impossible => None,
        }
    }
}

/// Outcome of running the decision procedure for one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    UpToDate,
    Impossible,
    Update {
        strategy: RequirementsToUnlock,
        dependencies: Vec<UpdatedDependency>,
    },
}

impl UpdateDecision {
    pub fn should_proceed(&self) -> bool {
        matches!(self, UpdateDecision::Update { .. })
    }

    /// Strategy the decision was made with.
    pub fn strategy(&self) -> Option<UnlockStrategy> {
        match self {
            UpdateDecision::UpToDate => None,
            UpdateDecision::Impossible => Some(UnlockStrategy::Impossible),
            UpdateDecision::Update { strategy, .. } => Some(match strategy {
                RequirementsToUnlock::None => UnlockStrategy::None,
                RequirementsToUnlock::Own => UnlockStrategy::Own,
                RequirementsToUnlock::All => UnlockStrategy::All,
            }),
        }
    }
}

/// Picks the narrowest unlock that makes the update feasible. Assumes the
/// dependency is already known to be out of date.
pub async fn unlock_strategy(
    checker: &dyn UpdateChecker,
) -> Result<UnlockStrategy> {
    if !checker.requirements_unlocked_or_can_be().await? {
        if checker.can_update(RequirementsToUnlock::None).await? {
            return Ok(UnlockStrategy::None);
        }
        return Ok(UnlockStrategy::Impossible);
    }

    if checker.can_update(RequirementsToUnlock::Own).await? {
        return Ok(UnlockStrategy::Own);
    }

    if checker.can_update(RequirementsToUnlock::All).await? {
        return Ok(UnlockStrategy::All);
    }

    Ok(UnlockStrategy::Impossible)
}

/// Runs the full decision procedure, fetching the updated dependency set
/// when an update is warranted.
pub async fn decide(
    dependency: &Dependency,
    checker: &dyn UpdateChecker,
) -> Result<UpdateDecision> {
    if checker.is_up_to_date().await? {
        debug!("{} is up to date", dependency.name);
        return Ok(UpdateDecision::UpToDate);
    }

    let strategy = unlock_strategy(checker).await?;

    let Some(requirements_to_unlock) = strategy.requirements_to_unlock()
    else {
        debug!("{} has no feasible update", dependency.name);
        return Ok(UpdateDecision::Impossible);
    };

    debug!(
        "updating {} with requirements to unlock: {requirements_to_unlock}",
        dependency.name
    );

    let dependencies = checker
        .updated_dependencies(requirements_to_unlock)
        .await?;

    Ok(UpdateDecision::Update {
        strategy: requirements_to_unlock,
        dependencies,
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        ecosystem::traits::MockUpdateChecker, error::BumpkinError,
        test_helpers::*,
    };

    fn out_of_date(unlockable: bool) -> MockUpdateChecker {
        let mut checker = MockUpdateChecker::new();
        checker.expect_is_up_to_date().returning(|| Ok(false));
        checker
            .expect_requirements_unlocked_or_can_be()
            .times(1)
            .returning(move || Ok(unlockable));
        checker
    }

    #[tokio::test]
    async fn up_to_date_short_circuits() {
        let mut checker = MockUpdateChecker::new();
        checker.expect_is_up_to_date().times(1).returning(|| Ok(true));
        checker.expect_requirements_unlocked_or_can_be().never();
        checker.expect_can_update().never();
        checker.expect_updated_dependencies().never();

        let decision =
            decide(&create_test_dependency("foo", "1.0"), &checker)
                .await
                .unwrap();

        assert_eq!(decision, UpdateDecision::UpToDate);
        assert!(!decision.should_proceed());
    }

    #[tokio::test]
    async fn locked_requirements_only_try_none() {
        let mut checker = out_of_date(false);
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::None))
            .times(1)
            .returning(|_| Ok(true));
        checker
            .expect_updated_dependencies()
            .with(eq(RequirementsToUnlock::None))
            .times(1)
            .returning(|_| {
                Ok(vec![create_test_updated_dependency("foo", "1.0", "1.1")])
            });

        let decision =
            decide(&create_test_dependency("foo", "1.0"), &checker)
                .await
                .unwrap();

        assert_eq!(decision.strategy(), Some(UnlockStrategy::None));
        match decision {
            UpdateDecision::Update { dependencies, .. } => {
                assert_eq!(dependencies.len(), 1);
                assert_eq!(dependencies[0].version.as_deref(), Some("1.1"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[tokio::test]
    async fn locked_requirements_without_update_are_impossible() {
        let mut checker = out_of_date(false);
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::None))
            .times(1)
            .returning(|_| Ok(false));
        checker.expect_updated_dependencies().never();

        let decision =
            decide(&create_test_dependency("foo", "1.0"), &checker)
                .await
                .unwrap();

        assert_eq!(decision, UpdateDecision::Impossible);
        assert!(!decision.should_proceed());
    }

    #[tokio::test]
    async fn unlockable_prefers_own_over_all() {
        let mut checker = out_of_date(true);
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::Own))
            .times(1)
            .returning(|_| Ok(true));
        checker
            .expect_updated_dependencies()
            .with(eq(RequirementsToUnlock::Own))
            .times(1)
            .returning(|_| Ok(vec![]));

        let decision =
            decide(&create_test_dependency("foo", "1.0"), &checker)
                .await
                .unwrap();

        assert_eq!(decision.strategy(), Some(UnlockStrategy::Own));
    }

    #[tokio::test]
    async fn unlockable_falls_back_to_all() {
        let mut checker = out_of_date(true);
        let mut seq = mockall::Sequence::new();
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::Own))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::All))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        checker
            .expect_updated_dependencies()
            .with(eq(RequirementsToUnlock::All))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    create_test_updated_dependency("foo", "1.0", "2.0"),
                    create_test_updated_dependency("bar", "3.0", "4.0"),
                ])
            });

        let decision =
            decide(&create_test_dependency("foo", "1.0"), &checker)
                .await
                .unwrap();

        assert_eq!(decision.strategy(), Some(UnlockStrategy::All));
        assert!(decision.should_proceed());
    }

    #[tokio::test]
    async fn unlockable_without_any_feasible_level_is_impossible() {
        let mut checker = out_of_date(true);
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::Own))
            .times(1)
            .returning(|_| Ok(false));
        checker
            .expect_can_update()
            .with(eq(RequirementsToUnlock::All))
            .times(1)
            .returning(|_| Ok(false));
        checker.expect_updated_dependencies().never();

        let strategy = unlock_strategy(&checker).await.unwrap();

        assert_eq!(strategy, UnlockStrategy::Impossible);
        assert_eq!(strategy.requirements_to_unlock(), None);
    }

    #[tokio::test]
    async fn checker_errors_propagate() {
        let mut checker = MockUpdateChecker::new();
        checker.expect_is_up_to_date().returning(|| Ok(false));
        checker.expect_requirements_unlocked_or_can_be().returning(|| {
            Err(BumpkinError::ecosystem("bundler", "registry unreachable"))
        });
        checker.expect_can_update().never();

        let err = decide(&create_test_dependency("foo", "1.0"), &checker)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("registry unreachable"));
    }
}
