//! Infraction review and free kicks for MatchEngine.

use super::MatchEngine;
use crate::engine::ball::PossessionQuality;
use crate::engine::constants::clock::FREE_KICK_STOPPAGE_SECS;
use crate::engine::field::FieldPos;
use crate::engine::roster::UnitId;
use crate::engine::umpire::{CallKind, InfractionKind};
use crate::models::{SimEvent, StoppageReason, TeamId};

impl MatchEngine {
    /// Have the umpires rule on `unit`'s conduct at the ball's location.
    ///
    /// A wrong call, or a right call on a genuine foul, gives the opposing
    /// team a free kick. Returns whether a free kick was awarded.
    pub fn check_for_infraction(&mut self, unit: UnitId, kind: InfractionKind) -> bool {
        let Some(offender_team) = self.roster.get(unit).map(|u| u.team) else {
            return false;
        };

        let position = self.ball.position();
        let call_correct = self.umpires.make_call(
            CallKind::Infraction(kind),
            position,
            self.controller.speed(),
            self.momentum.crowd_noise(),
            &mut self.rng,
        );
        let free_kick_to = (!call_correct || kind.is_foul()).then(|| offender_team.opponent());
        self.emit(SimEvent::InfractionReviewed { unit, kind, call_correct, free_kick_to });

        match free_kick_to {
            Some(team) => {
                self.award_free_kick(team, position);
                true
            }
            None => false,
        }
    }

    /// Ball to the official at `position`, then clean possession to the
    /// awarded team's nearest live unit. With nobody to take it, the ball
    /// stays with the official.
    pub fn award_free_kick(&mut self, team: TeamId, position: FieldPos) {
        let spot = self.field.clamp(position);
        self.ball.place_with_official(spot);

        let recipient = self.roster.nearest_of_team(team, spot);
        if let Some(id) = recipient {
            if let Some(pos) = self.roster.get(id).map(|u| u.position()) {
                self.ball.grant_possession(id, team, pos, PossessionQuality::Clean);
            }
        }
        log::info!("free kick to team {} at ({:.1}, {:.1})", team.0, spot.x, spot.y);
        self.emit(SimEvent::FreeKickAwarded { team, position: spot, recipient });

        if self.controller.phase().is_quarter() {
            self.begin_stoppage(StoppageReason::FreeKick, FREE_KICK_STOPPAGE_SECS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::*;
    use crate::engine::ball::BallState;
    use crate::engine::field::GridCell;
    use crate::models::{Role, UnitSpec};

    #[test]
    fn test_free_kick_goes_to_nearest_of_awarded_team() {
        let mut engine = MatchEngine::with_seed(1);
        let far = engine
            .register_unit(UnitSpec::new("Far", TeamId::AWAY, Role::Forward, GridCell::new(40, 20)))
            .unwrap();
        let near = engine
            .register_unit(UnitSpec::new("Near", TeamId::AWAY, Role::Forward, GridCell::new(12, 11)))
            .unwrap();
        engine
            .register_unit(UnitSpec::new("Closest", TeamId::HOME, Role::Forward, GridCell::new(10, 10)))
            .unwrap();

        engine.award_free_kick(TeamId::AWAY, FieldPos::new(10.0, 10.0));
        let ball = engine.ball();
        assert_eq!(ball.state(), BallState::HeldClean);
        assert_eq!(ball.holder(), Some(near));
        assert_ne!(ball.holder(), Some(far));
        assert_eq!(ball.holder_team(), Some(TeamId::AWAY));
        assert_eq!(ball.position(), FieldPos::new(12.0, 11.0));
    }

    #[test]
    fn test_free_kick_with_empty_team_stays_with_official() {
        let mut engine = MatchEngine::with_seed(2);
        engine
            .register_unit(UnitSpec::new("Home", TeamId::HOME, Role::Forward, GridCell::new(10, 10)))
            .unwrap();
        engine.award_free_kick(TeamId::AWAY, FieldPos::new(15.0, 15.0));
        assert_eq!(engine.ball().state(), BallState::WithOfficial);
        assert_eq!(engine.ball().position(), FieldPos::new(15.0, 15.0));
        assert_eq!(engine.ball().holder(), None);
    }

    #[test]
    fn test_foul_always_gives_free_kick() {
        for seed in 0..30 {
            let mut engine = engine_with_squads(seed, 3);
            engine.start_match().unwrap();
            let offender = engine.unit_ids()[0];
            assert!(engine.check_for_infraction(offender, InfractionKind::HoldingTheBall));
            let offender_team = engine.unit(offender).unwrap().team;
            assert_eq!(engine.ball().holder_team(), Some(offender_team.opponent()));
            assert!(engine.controller().in_stoppage());
        }
    }

    #[test]
    fn test_legal_tackle_free_kick_only_on_wrong_call() {
        let mut awarded = 0;
        for seed in 0..200 {
            let mut engine = engine_with_squads(seed, 3);
            engine.start_match().unwrap();
            let unit = engine.unit_ids()[0];
            if engine.check_for_infraction(unit, InfractionKind::LegalTackle) {
                awarded += 1;
            }
        }
        // Ball at centre under the middle umpire, full play speed: accuracy about 0.75.
        assert!((25..=80).contains(&awarded), "awarded {awarded}");
    }

    #[test]
    fn test_fast_ball_does_not_blind_the_umpire() {
        use crate::engine::resolver::Action;

        let mut awarded = 0;
        for seed in 0..200 {
            let mut engine = MatchEngine::with_seed(seed);
            let kicker = engine
                .register_unit(UnitSpec::new("Kicker", TeamId::HOME, Role::Forward, GridCell::new(2, 16)))
                .unwrap();
            let tackler = engine
                .register_unit(UnitSpec::new("Tackler", TeamId::AWAY, Role::Defender, GridCell::new(40, 16)))
                .unwrap();
            engine.start_match().unwrap();
            engine.award_free_kick(TeamId::HOME, FieldPos::new(2.0, 16.0));
            engine.execute_action(kicker, Action::Kick { target: FieldPos::new(47.0, 16.0), power: 1.0 });
            assert!(engine.ball().velocity().norm() > 1.0);

            if engine.check_for_infraction(tackler, InfractionKind::LegalTackle) {
                awarded += 1;
            }
        }
        // Ten units from the nearest umpire: accuracy about 0.6 whatever the ball does.
        assert!((40..=130).contains(&awarded), "awarded {awarded}");
    }

    #[test]
    fn test_stale_unit_is_not_reviewed() {
        let mut engine = engine_with_squads(5, 2);
        let id = engine.unit_ids()[0];
        engine.reset().unwrap();
        assert!(!engine.check_for_infraction(id, InfractionKind::HighTackle));
    }
}
