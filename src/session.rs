//! Session flow
//!
//! The top-level modal state machine. Each screen handles its own input and
//! only `Playing` advances the simulation, so name entry, quizzes and the
//! leaderboard view all pause the run.
//!
//! ```text
//! Idle → EnteringName → Playing ⇄ Quiz
//!                          ↓
//!          EnteringName ← GameOver ⇄ ViewingBoard
//! ```

use std::collections::VecDeque;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundCue};
use crate::leaderboard::ScoreSink;
use crate::quiz::Quiz;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Longest accepted username
pub const MAX_NAME_LEN: usize = 4;

/// A key press delivered to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    /// Leave the game immediately
    Quit,
}

/// Input gathered for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInput {
    /// Steering keys currently held
    pub left: bool,
    pub right: bool,
    /// Keys pressed since the last frame, oldest first
    pub keys: Vec<Key>,
}

impl SessionInput {
    pub fn press(key: Key) -> Self {
        Self {
            keys: vec![key],
            ..Self::default()
        }
    }
}

/// Current modal screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Not started yet
    Idle,
    EnteringName { name: String },
    Playing,
    /// Blocking powerup question
    Quiz { quiz: Quiz },
    /// Final score shown, waiting for restart or leaderboard view
    GameOver,
    ViewingBoard,
}

/// Whether the frame loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One player's session: repeated runs under a username
pub struct Session<S: ScoreSink, A: AudioSink> {
    screen: Screen,
    username: String,
    state: GameState,
    quizzes: VecDeque<Quiz>,
    rng: Pcg32,
    sink: S,
    audio: A,
    leaderboard_page: String,
    /// One-shot guards for the current run
    death_cue_played: bool,
    score_submitted: bool,
}

impl<S: ScoreSink, A: AudioSink> Session<S, A> {
    pub fn new(seed: u64, sink: S, audio: A, leaderboard_page: impl Into<String>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(rng.next_u64());
        Self {
            screen: Screen::Idle,
            username: String::new(),
            state,
            quizzes: VecDeque::new(),
            rng,
            sink,
            audio,
            leaderboard_page: leaderboard_page.into(),
            death_cue_played: false,
            score_submitted: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn leaderboard_page(&self) -> &str {
        &self.leaderboard_page
    }

    pub fn score_submitted(&self) -> bool {
        self.score_submitted
    }

    /// Run one frame of whichever screen is up
    pub fn frame(&mut self, input: &SessionInput) -> Flow {
        if input.keys.contains(&Key::Quit) {
            log::info!("Quit requested");
            return Flow::Quit;
        }

        match self.screen {
            Screen::Idle => {
                self.screen = Screen::EnteringName {
                    name: String::new(),
                };
            }
            Screen::EnteringName { .. } => self.enter_name(&input.keys),
            Screen::Playing => self.play(input),
            Screen::Quiz { .. } => self.answer_quiz(&input.keys),
            Screen::GameOver => self.game_over(&input.keys),
            Screen::ViewingBoard => {
                let dismissed = input
                    .keys
                    .iter()
                    .any(|k| matches!(k, Key::Escape | Key::Char('h') | Key::Char('H')));
                if dismissed {
                    self.screen = Screen::GameOver;
                }
            }
        }
        Flow::Continue
    }

    fn enter_name(&mut self, keys: &[Key]) {
        let Screen::EnteringName { name } = &mut self.screen else {
            return;
        };
        let mut confirmed = None;
        for key in keys {
            match key {
                Key::Char(c) if c.is_alphabetic() && name.chars().count() < MAX_NAME_LEN => {
                    name.push(*c);
                }
                Key::Backspace => {
                    name.pop();
                }
                Key::Enter if !name.is_empty() => {
                    confirmed = Some(name.clone());
                    break;
                }
                _ => {}
            }
        }
        if let Some(name) = confirmed {
            self.start_run(name);
        }
    }

    fn start_run(&mut self, username: String) {
        self.username = username;
        self.state = GameState::new(self.rng.next_u64());
        self.quizzes.clear();
        self.death_cue_played = false;
        self.score_submitted = false;
        log::info!("Run started for {} (seed {})", self.username, self.state.seed);
        self.audio.play_music();
        self.screen = Screen::Playing;
    }

    fn play(&mut self, input: &SessionInput) {
        let tick_input = TickInput {
            left: input.left,
            right: input.right,
        };
        tick(&mut self.state, &tick_input);

        for event in self.state.drain_events() {
            match event {
                GameEvent::PowerupCollected { .. } => {
                    self.quizzes.push_back(Quiz::pick(&mut self.rng));
                }
                GameEvent::PlayerDestroyed { .. } => {
                    self.audio.stop_music();
                    if !self.death_cue_played {
                        self.audio.play(SoundCue::Death);
                        self.death_cue_played = true;
                    }
                }
                GameEvent::ShieldAbsorbed
                | GameEvent::FireWallIncoming
                | GameEvent::FireWallCleared => {}
            }
        }

        if let Some(quiz) = self.quizzes.pop_front() {
            self.screen = Screen::Quiz { quiz };
            return;
        }

        // Terminal screen waits for the explosion to finish
        if self.state.is_over() && self.state.particles.is_empty() {
            self.submit_score();
            self.screen = Screen::GameOver;
        }
    }

    fn answer_quiz(&mut self, keys: &[Key]) {
        let Screen::Quiz { quiz } = &self.screen else {
            return;
        };
        let choice = keys.iter().find_map(|key| match key {
            Key::Char(c @ '1'..='3') => c.to_digit(10).map(|d| d as usize - 1),
            _ => None,
        });
        let Some(choice) = choice else {
            return;
        };

        let correct = quiz.is_correct(choice);
        self.state.apply_quiz_answer(correct);
        self.screen = match self.quizzes.pop_front() {
            Some(quiz) => Screen::Quiz { quiz },
            None => Screen::Playing,
        };
    }

    fn game_over(&mut self, keys: &[Key]) {
        for key in keys {
            match key {
                Key::Char('r') | Key::Char('R') => {
                    self.screen = Screen::EnteringName {
                        name: String::new(),
                    };
                    return;
                }
                Key::Char('h') | Key::Char('H') => {
                    self.screen = Screen::ViewingBoard;
                    return;
                }
                _ => {}
            }
        }
    }

    /// Send the final score once per run; failures are logged and dropped
    fn submit_score(&mut self) {
        if self.score_submitted {
            return;
        }
        self.score_submitted = true;
        let score = self.state.final_score();
        if let Err(e) = self.sink.submit(&self.username, score) {
            log::error!("Score submission failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::error::{Error, Result};
    use crate::leaderboard::MemoryLeaderboard;
    use crate::sim::{Obstacle, Powerup};

    #[derive(Default)]
    struct RecordingAudio {
        music_on: bool,
        cues: Vec<SoundCue>,
    }

    impl AudioSink for RecordingAudio {
        fn play_music(&mut self) {
            self.music_on = true;
        }
        fn stop_music(&mut self) {
            self.music_on = false;
        }
        fn play(&mut self, cue: SoundCue) {
            self.cues.push(cue);
        }
    }

    struct FailingSink {
        attempts: u32,
    }

    impl ScoreSink for FailingSink {
        fn submit(&mut self, _username: &str, _score: u64) -> Result<()> {
            self.attempts += 1;
            Err(Error::Rejected {
                status: 400,
                message: "Invalid request format".to_string(),
            })
        }
    }

    type TestSession = Session<MemoryLeaderboard, RecordingAudio>;

    fn new_session() -> TestSession {
        Session::new(
            2024,
            MemoryLeaderboard::default(),
            RecordingAudio::default(),
            "http://127.0.0.1:5000",
        )
    }

    fn type_name(session: &mut Session<impl ScoreSink, impl AudioSink>, name: &str) {
        let mut keys: Vec<Key> = name.chars().map(Key::Char).collect();
        keys.push(Key::Enter);
        session.frame(&SessionInput {
            keys,
            ..SessionInput::default()
        });
    }

    fn playing_session() -> TestSession {
        let mut session = new_session();
        session.frame(&SessionInput::default());
        type_name(&mut session, "NEON");
        assert_eq!(session.screen(), &Screen::Playing);
        session
    }

    fn place_obstacle_on_player(state: &mut GameState) {
        let id = state.next_entity_id();
        let hitbox = state.player.hitbox();
        let obstacle =
            Obstacle::drone(id, &mut state.rng, 0).with_position(hitbox.min.x, hitbox.min.y - 3.0);
        state.obstacles.push(obstacle);
    }

    fn place_powerup_on_player(state: &mut GameState) {
        let id = state.next_entity_id();
        let hitbox = state.player.hitbox();
        let powerup = Powerup::spawn(id, &mut state.rng).with_position(hitbox.min.x, hitbox.min.y);
        state.powerups.push(powerup);
    }

    fn idle() -> SessionInput {
        SessionInput::default()
    }

    #[test]
    fn test_idle_goes_to_name_entry() {
        let mut session = new_session();
        assert_eq!(session.screen(), &Screen::Idle);
        session.frame(&idle());
        assert_eq!(
            session.screen(),
            &Screen::EnteringName {
                name: String::new()
            }
        );
    }

    #[test]
    fn test_name_entry_rules() {
        let mut session = new_session();
        session.frame(&idle());

        // Enter on an empty name does nothing
        session.frame(&SessionInput::press(Key::Enter));
        assert!(matches!(session.screen(), Screen::EnteringName { .. }));

        let keys = vec![
            Key::Char('a'),
            Key::Char('1'),
            Key::Char(' '),
            Key::Char('b'),
            Key::Char('c'),
            Key::Char('d'),
            Key::Char('e'),
            Key::Backspace,
            Key::Char('z'),
        ];
        session.frame(&SessionInput {
            keys,
            ..SessionInput::default()
        });
        assert_eq!(
            session.screen(),
            &Screen::EnteringName {
                name: "abcz".to_string()
            }
        );

        session.frame(&SessionInput::press(Key::Enter));
        assert_eq!(session.screen(), &Screen::Playing);
        assert_eq!(session.username(), "abcz");
        assert!(session.audio().music_on);
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut session = new_session();
        assert_eq!(session.frame(&SessionInput::press(Key::Quit)), Flow::Quit);
        let mut session = playing_session();
        assert_eq!(session.frame(&SessionInput::press(Key::Quit)), Flow::Quit);
    }

    #[test]
    fn test_score_monotonic_while_alive() {
        let mut session = playing_session();
        let mut last = session.state().score;
        for _ in 0..600 {
            session.state_mut().player.shield = true;
            session.frame(&SessionInput {
                left: true,
                ..SessionInput::default()
            });
            if session.state().is_over() {
                break;
            }
            if let Screen::Quiz { quiz } = session.screen().clone() {
                let wrong = (quiz.correct + 1) % 3;
                let digit = char::from_digit(wrong as u32 + 1, 10).unwrap();
                session.frame(&SessionInput::press(Key::Char(digit)));
            }
            let score = session.state().score;
            assert!(score >= last);
            last = score;
            let half = PLAYER_WIDTH / 2.0;
            let x = session.state().player.pos.x;
            assert!(x >= half && x <= SCREEN_WIDTH - half);
        }
    }

    /// Scenario A: score never reaches the threshold, so no fire wall
    #[test]
    fn test_no_fire_wall_without_threshold() {
        let mut session = playing_session();
        for _ in 0..15_000 {
            let state = session.state_mut();
            state.player.shield = true;
            state.score = state.score.min(FIRE_WALL_SCORE_THRESHOLD - 1.0);
            session.frame(&idle());
            if let Screen::Quiz { .. } = session.screen() {
                session.frame(&SessionInput::press(Key::Char('2')));
            }
            assert!(!session.state().fire_wall.is_active());
            if session.state().is_over() {
                break;
            }
        }
    }

    /// Scenario B: unshielded collision ends the run, explodes once and
    /// submits once after the explosion settles
    #[test]
    fn test_forced_collision_sequence() {
        let mut session = playing_session();
        session.frame(&idle());
        session.state_mut().obstacles.clear();
        session.state_mut().powerups.clear();
        place_obstacle_on_player(session.state_mut());

        session.frame(&idle());
        assert!(session.state().is_over());
        assert!(session.state().explosion_spawned);
        assert_eq!(session.audio().cues, vec![SoundCue::Death]);
        assert!(!session.audio().music_on);
        assert!(session.sink().submissions.is_empty());

        let mut peak = session.state().particles.len();
        let mut frames = 0;
        while session.screen() == &Screen::Playing {
            session.frame(&idle());
            let count = session.state().particles.len();
            assert!(count <= peak);
            peak = count;
            if !session.state().particles.is_empty() {
                assert!(session.sink().submissions.is_empty());
            }
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(session.screen(), &Screen::GameOver);
        assert_eq!(session.sink().submissions.len(), 1);
        let submission = &session.sink().submissions[0];
        assert_eq!(submission.username, "NEON");
        assert_eq!(submission.score, session.state().final_score());

        for _ in 0..30 {
            session.frame(&idle());
        }
        assert_eq!(session.sink().submissions.len(), 1);
        assert_eq!(session.audio().cues.len(), 1);
    }

    /// Scenario C: correct answer pays 50 and arms the shield
    #[test]
    fn test_powerup_quiz_correct() {
        let mut session = playing_session();
        place_powerup_on_player(session.state_mut());
        session.frame(&idle());
        let Screen::Quiz { quiz } = session.screen().clone() else {
            panic!("expected quiz, got {:?}", session.screen());
        };

        let score = session.state().score;
        let ticks = session.state().time_ticks;
        // Quiz blocks the simulation
        session.frame(&SessionInput::press(Key::Char('9')));
        assert_eq!(session.state().time_ticks, ticks);

        let digit = char::from_digit(quiz.correct as u32 + 1, 10).unwrap();
        session.frame(&SessionInput::press(Key::Char(digit)));
        assert_eq!(session.screen(), &Screen::Playing);
        assert_eq!(session.state().score, score + QUIZ_BONUS);
        assert!(session.state().player.shield);
    }

    /// Scenario C: wrong answer changes nothing
    #[test]
    fn test_powerup_quiz_wrong() {
        let mut session = playing_session();
        place_powerup_on_player(session.state_mut());
        session.frame(&idle());
        let Screen::Quiz { quiz } = session.screen().clone() else {
            panic!("expected quiz");
        };

        let score = session.state().score;
        let wrong = (quiz.correct + 1) % 3;
        let digit = char::from_digit(wrong as u32 + 1, 10).unwrap();
        session.frame(&SessionInput::press(Key::Char(digit)));
        assert_eq!(session.state().score, score);
        assert!(!session.state().player.shield);

        let before = session.state().score;
        let multiplier = session.state().combo.multiplier();
        session.frame(&idle());
        assert!(session.state().score >= before + multiplier / FPS as f64 - 1e-9);
    }

    #[test]
    fn test_game_over_navigation() {
        let mut session = playing_session();
        place_obstacle_on_player(session.state_mut());
        while session.screen() != &Screen::GameOver {
            session.frame(&idle());
        }

        session.frame(&SessionInput::press(Key::Char('h')));
        assert_eq!(session.screen(), &Screen::ViewingBoard);
        session.frame(&SessionInput::press(Key::Char('x')));
        assert_eq!(session.screen(), &Screen::ViewingBoard);
        session.frame(&SessionInput::press(Key::Escape));
        assert_eq!(session.screen(), &Screen::GameOver);

        session.frame(&SessionInput::press(Key::Char('R')));
        assert!(matches!(session.screen(), Screen::EnteringName { .. }));
        type_name(&mut session, "ANN");
        assert_eq!(session.screen(), &Screen::Playing);
        assert!(!session.score_submitted());
        assert_eq!(session.state().time_ticks, 0);
    }

    #[test]
    fn test_failed_submission_is_not_fatal() {
        let mut session = Session::new(
            7,
            FailingSink { attempts: 0 },
            RecordingAudio::default(),
            "http://127.0.0.1:5000",
        );
        session.frame(&idle());
        type_name(&mut session, "FAIL");
        place_obstacle_on_player(session.state_mut());
        while session.screen() != &Screen::GameOver {
            session.frame(&idle());
        }
        for _ in 0..10 {
            assert_eq!(session.frame(&idle()), Flow::Continue);
        }
        assert_eq!(session.sink().attempts, 1);
        assert!(session.score_submitted());
    }
}
