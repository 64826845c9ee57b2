//! Game session management
//!
//! A session owns one game behind its own lock. The AI turn holds that lock
//! across selection and placement, so a human move can never land between
//! the two. The registry lock only guards lookup and insertion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::board::{Pos, Stone};
use crate::engine::{MoveSelector, Selection};
use crate::error::{MoveError, SessionError};
use crate::game::{GameEngine, MoveRecord, Placement};
use crate::profile::{Difficulty, ProfileSet};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Wire view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub id: SessionId,
    pub size: usize,
    pub board: Vec<Vec<u8>>,
    pub current_turn: Stone,
    pub winner: Option<Stone>,
    pub game_over: bool,
    pub draw: bool,
    pub difficulty: Difficulty,
    pub history: Vec<MoveRecord>,
    pub last_move: Option<Pos>,
}

#[derive(Debug)]
struct SessionState {
    game: GameEngine,
    difficulty: Difficulty,
}

/// One game and the tuning it is played with.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    state: Mutex<SessionState>,
    selector: MoveSelector,
    profiles: Arc<ProfileSet>,
}

impl Session {
    pub fn new(
        id: SessionId,
        game: GameEngine,
        difficulty: Difficulty,
        selector: MoveSelector,
        profiles: Arc<ProfileSet>,
    ) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState { game, difficulty }),
            selector,
            profiles,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock cannot leave the engine half-updated
        // (apply commits last), so the inner state is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Human move for whoever is to play.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play(&self, pos: Pos) -> Result<Placement, SessionError> {
        let mut state = self.lock();
        let player = state.game.current_turn();
        state.game.apply(pos, player).map_err(|e| {
            debug!(%pos, %player, reason = e.tag(), "move rejected");
            SessionError::Move(e)
        })
    }

    /// Human move that must be played as `player`.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play_as(&self, pos: Pos, player: Stone) -> Result<Placement, SessionError> {
        let mut state = self.lock();
        Ok(state.game.apply(pos, player)?)
    }

    /// Let the engine play for the side to move.
    #[instrument(skip(self, rng), fields(session_id = %self.id))]
    pub fn ai_move<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Selection, Placement), SessionError> {
        let mut state = self.lock();
        if state.game.is_over() {
            return Err(MoveError::GameOver.into());
        }
        let mover = state.game.current_turn();
        let profile = self.profiles.get(state.difficulty);
        let history = state.game.history();

        let selection =
            self.selector
                .select_move(state.game.board(), mover, profile, &history, rng)?;
        if let Some(warning) = &selection.warning {
            warn!(%warning, "advisory degraded");
        }

        match state.game.apply(selection.pos, mover) {
            Ok(placement) => {
                info!(pos = %selection.pos, %mover, source = %selection.source, "engine move");
                Ok((selection, placement))
            }
            Err(source) => {
                error!(pos = %selection.pos, %source, "selector produced an illegal move");
                Err(SessionError::Invariant {
                    pos: selection.pos,
                    source,
                })
            }
        }
    }

    /// Hint for the side to move. Never changes the game.
    pub fn suggest<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Selection, SessionError> {
        let state = self.lock();
        if state.game.is_over() {
            return Err(MoveError::GameOver.into());
        }
        let history = state.game.history();
        Ok(self
            .selector
            .suggest_move(state.game.board(), state.game.current_turn(), &history, rng)?)
    }

    pub fn undo(&self, count: usize) {
        self.lock().game.undo(count);
    }

    /// Start over on an empty board of the same size.
    pub fn reset(&self) -> Result<(), SessionError> {
        let mut state = self.lock();
        state.game = GameEngine::new(state.game.board().size())?;
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.lock().difficulty
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.lock().difficulty = difficulty;
    }

    pub fn current_turn(&self) -> Stone {
        self.lock().game.current_turn()
    }

    /// Copy of the game, for rendering without holding the lock
    pub fn game(&self) -> GameEngine {
        self.lock().game.clone()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let state = self.lock();
        let game = &state.game;
        GameSnapshot {
            id: self.id.clone(),
            size: game.board().size(),
            board: game.board().to_rows(),
            current_turn: game.current_turn(),
            winner: game.winner(),
            game_over: game.is_over(),
            draw: game.is_draw(),
            difficulty: state.difficulty,
            history: game.history(),
            last_move: game.last_move(),
        }
    }
}

/// Manages all game sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Arc<Session>>>,
    next_id: AtomicU64,
    board_size: usize,
    selector: MoveSelector,
    profiles: Arc<ProfileSet>,
}

impl SessionRegistry {
    pub fn new(board_size: usize, selector: MoveSelector, profiles: ProfileSet) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            board_size,
            selector,
            profiles: Arc::new(profiles),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a fresh game and return its session.
    #[instrument(skip(self))]
    pub fn create(&self, difficulty: Difficulty) -> Result<Arc<Session>, SessionError> {
        let game = GameEngine::new(self.board_size)?;
        let id = format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(Session::new(
            id.clone(),
            game,
            difficulty,
            self.selector.clone(),
            Arc::clone(&self.profiles),
        ));
        self.sessions().insert(id.clone(), Arc::clone(&session));
        info!(session_id = %id, %difficulty, "created session");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        self.sessions()
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let removed = self.sessions().remove(id);
        if removed.is_some() {
            debug!(session_id = id, "removed session");
        }
        removed
    }

    pub fn ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{AdvisoryRequest, Advisor};
    use crate::error::AdvisoryError;
    use crate::rules::ForbiddenReason;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::thread;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(15, MoveSelector::new(), ProfileSet::default())
    }

    struct Timeout;

    impl Advisor for Timeout {
        fn advise(&self, _: &AdvisoryRequest) -> Result<Value, AdvisoryError> {
            Err(AdvisoryError::Timeout)
        }
    }

    #[test]
    fn test_registry_create_and_lookup() {
        let reg = registry();
        let a = reg.create(Difficulty::Beginner).unwrap();
        let b = reg.create(Difficulty::Advanced).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(a.id()).unwrap().difficulty(), Difficulty::Beginner);
        assert!(matches!(reg.get("nope"), Err(SessionError::NotFound(_))));
        assert!(reg.remove(a.id()).is_some());
        assert_eq!(reg.ids(), vec![b.id().to_string()]);
    }

    #[test]
    fn test_invalid_board_size_rejected() {
        let reg = SessionRegistry::new(30, MoveSelector::new(), ProfileSet::default());
        assert!(matches!(reg.create(Difficulty::Beginner), Err(SessionError::Board(_))));
    }

    #[test]
    fn test_human_then_ai() {
        let reg = registry();
        let session = reg.create(Difficulty::Advanced).unwrap();
        session.play(Pos::new(7, 7)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (selection, placement) = session.ai_move(&mut rng).unwrap();
        assert_eq!(placement, Placement::Placed { next: Stone::Black });

        let snap = session.snapshot();
        assert_eq!(snap.history.len(), 2);
        assert_eq!(snap.history[1].pos(), selection.pos);
        assert_eq!(snap.history[1].player, Stone::White);
        assert_eq!(snap.current_turn, Stone::Black);
        assert!(!snap.game_over);
    }

    #[test]
    fn test_forbidden_rejection_keeps_turn() {
        let reg = registry();
        let session = reg.create(Difficulty::Beginner).unwrap();
        for (x, y) in [(6, 7), (0, 0), (8, 7), (0, 2), (7, 6), (0, 4), (7, 8), (14, 14)] {
            session.play(Pos::new(x, y)).unwrap();
        }
        let err = session.play(Pos::new(7, 7)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Move(MoveError::Forbidden(ForbiddenReason::DoubleThree))
        ));
        assert_eq!(session.current_turn(), Stone::Black);
        assert_eq!(session.snapshot().history.len(), 8);
    }

    #[test]
    fn test_play_as_wrong_turn() {
        let reg = registry();
        let session = reg.create(Difficulty::Beginner).unwrap();
        let err = session.play_as(Pos::new(7, 7), Stone::White).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Move(MoveError::WrongTurn { expected: Stone::Black })
        ));
    }

    #[test]
    fn test_ai_move_with_advisory_timeout() {
        let reg = SessionRegistry::new(
            15,
            MoveSelector::new().with_advisor(Arc::new(Timeout)),
            ProfileSet::default(),
        );
        let session = reg.create(Difficulty::Beginner).unwrap();
        session.play(Pos::new(7, 7)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let (selection, _) = session.ai_move(&mut rng).unwrap();
        assert!(selection.warning.is_some());
        assert_eq!(session.snapshot().history.len(), 2);
    }

    #[test]
    fn test_ai_refuses_after_game_over() {
        let reg = registry();
        let session = reg.create(Difficulty::Advanced).unwrap();
        for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0)] {
            session.play(Pos::new(x, y)).unwrap();
        }
        let snap = session.snapshot();
        assert!(snap.game_over);
        assert_eq!(snap.winner, Some(Stone::Black));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            session.ai_move(&mut rng),
            Err(SessionError::Move(MoveError::GameOver))
        ));
        assert!(session.suggest(&mut rng).is_err());
    }

    #[test]
    fn test_suggest_does_not_change_state() {
        let reg = registry();
        let session = reg.create(Difficulty::Beginner).unwrap();
        session.play(Pos::new(7, 7)).unwrap();
        let before = session.snapshot();
        let hint = session.suggest(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(session.game().board().is_empty(hint.pos));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_undo_and_reset() {
        let reg = registry();
        let session = reg.create(Difficulty::Advanced).unwrap();
        session.play(Pos::new(7, 7)).unwrap();
        session.ai_move(&mut StdRng::seed_from_u64(2)).unwrap();
        session.undo(2);
        assert!(session.snapshot().history.is_empty());
        session.play(Pos::new(3, 3)).unwrap();
        session.reset().unwrap();
        assert_eq!(session.current_turn(), Stone::Black);
        assert!(session.game().board().is_board_empty());
    }

    #[test]
    fn test_concurrent_human_and_ai_moves_stay_consistent() {
        let reg = Arc::new(registry());
        let session = reg.create(Difficulty::Beginner).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(t);
                    for i in 0..10u8 {
                        if t % 2 == 0 {
                            let _ = session.ai_move(&mut rng);
                        } else {
                            let _ = session.play(Pos::new((i + t as u8 * 3) % 15, i));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // History replays to exactly the board the session holds
        let snap = session.snapshot();
        let replayed = GameEngine::replay(15, &snap.history).unwrap();
        assert_eq!(replayed.board().to_rows(), snap.board);
        assert_eq!(replayed.current_turn(), snap.current_turn);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let reg = registry();
        let session = reg.create(Difficulty::Advanced).unwrap();
        session.play(Pos::new(2, 3)).unwrap();
        let wire = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(wire["board"][3][2], 1);
        assert_eq!(wire["current_turn"], 2);
        assert_eq!(wire["difficulty"], "advanced");
        assert_eq!(wire["history"][0]["move_no"], 1);
        assert_eq!(wire["history"][0]["player"], 1);
        assert_eq!(wire["winner"], Value::Null);
    }
}
