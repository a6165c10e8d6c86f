use chrono::NaiveTime;
use condition_selector::{DifficultyTransition, SelectError};
use session_core::{
    ActiveHours, Condition, ConditionParams, HistoryEntry, Paradigm, SessionParams, WallClock,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};
use trial_fsm::{
    BehaviorAdapter, ControlAdapter, Experiment, Period, Response, SessionError, SessionEvent,
    SessionObserver, SetupInfo, SetupStatus, StateId, StimulusAdapter, TrialOutcome, TrialRecord,
};

/// Sessions that run longer than this many status polls are cut off.
const POLL_LIMIT: usize = 50_000;
const ITI_LICK_GAP: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Answer {
    Correct,
    Wrong,
    Silent,
    /// Responds in every period, including cue and delay.
    Premature,
}

#[derive(Default)]
struct RigLog {
    tick: u64,
    events: Vec<SessionEvent>,
    records: Vec<TrialRecord>,
    pushed: Vec<SetupStatus>,
    infos: Vec<SetupInfo>,
    status: SetupStatus,
    status_polls: usize,
    stop_after_trials: Option<usize>,
    stop_after_status: Option<SetupStatus>,
    stop_after_polls: Option<usize>,
    /// A sleeping session sees `wakeup` from this poll on.
    wakeup_after_polls: Option<usize>,
    /// `is_ready` refuses hold times of at least this many ms.
    ready_limit_ms: Option<u64>,
    /// Licks handed out during InterTrial, spaced `ITI_LICK_GAP` apart.
    iti_licks: usize,
    last_iti_lick: Option<Instant>,
    wakeups: usize,
    period: Option<Period>,
    periods: Vec<Period>,
    history_updates: Vec<HistoryEntry>,
    behavior_exits: usize,
    stimulus_exits: usize,
    transitions: Vec<DifficultyTransition>,
    entries: Vec<StateId>,
    entry_times: Vec<(StateId, Instant)>,
}

type Shared = Rc<RefCell<RigLog>>;

impl RigLog {
    fn tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn onsets(&self) -> Vec<StateId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::StateOnset { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }
}

struct MockControl(Shared);

impl ControlAdapter for MockControl {
    fn log(&mut self, event: &SessionEvent) -> anyhow::Result<u64> {
        let mut log = self.0.borrow_mut();
        log.events.push(event.clone());
        Ok(log.tick())
    }

    fn update_setup_info(&mut self, info: &SetupInfo) -> anyhow::Result<()> {
        let mut log = self.0.borrow_mut();
        if let Some(status) = info.status {
            log.status = status;
            log.pushed.push(status);
        }
        log.infos.push(info.clone());
        Ok(())
    }

    fn setup_status(&mut self) -> anyhow::Result<SetupStatus> {
        let mut log = self.0.borrow_mut();
        log.status_polls += 1;
        if log.status_polls > POLL_LIMIT {
            return Ok(SetupStatus::Exit);
        }
        if let Some(n) = log.stop_after_trials {
            if log.records.len() >= n {
                log.status = SetupStatus::Stop;
            }
        }
        if let Some(trigger) = log.stop_after_status {
            if log.pushed.contains(&trigger) {
                log.status = SetupStatus::Stop;
            }
        }
        if log.stop_after_polls.map_or(false, |n| log.status_polls >= n) {
            log.status = SetupStatus::Stop;
        }
        if log.status == SetupStatus::Sleeping
            && log.wakeup_after_polls.map_or(false, |n| log.status_polls >= n)
        {
            log.status = SetupStatus::Wakeup;
            log.wakeups += 1;
        }
        Ok(log.status)
    }

    fn init_trial(&mut self, _trial_idx: u64, _condition_hash: &str) -> anyhow::Result<u64> {
        Ok(self.0.borrow_mut().tick())
    }

    fn log_trial(&mut self, record: &TrialRecord) -> anyhow::Result<()> {
        self.0.borrow_mut().records.push(record.clone());
        Ok(())
    }
}

struct MockBehavior {
    log: Shared,
    plan: VecDeque<Answer>,
    answer: Answer,
    port: u32,
    last: Option<Response>,
}

impl MockBehavior {
    fn new(log: &Shared, plan: &[Answer]) -> Self {
        Self {
            log: log.clone(),
            plan: plan.iter().copied().collect(),
            answer: Answer::Silent,
            port: 1,
            last: None,
        }
    }
}

impl BehaviorAdapter for MockBehavior {
    fn prepare(&mut self, condition: &Condition) -> anyhow::Result<()> {
        self.answer = self.plan.pop_front().unwrap_or(Answer::Correct);
        self.port = condition.params().response_port;
        self.last = None;
        Ok(())
    }

    fn is_ready(&mut self, min_duration_ms: u64, _since_ms: u64) -> anyhow::Result<bool> {
        let limit = self.log.borrow().ready_limit_ms;
        Ok(limit.map_or(true, |limit| min_duration_ms < limit))
    }

    fn get_response(&mut self, _since_ms: u64) -> anyhow::Result<bool> {
        let mut log = self.log.borrow_mut();
        if log.entries.last() == Some(&StateId::InterTrial) {
            let due = log.last_iti_lick.map_or(true, |t| t.elapsed() >= ITI_LICK_GAP);
            if log.iti_licks == 0 || !due {
                return Ok(false);
            }
            log.iti_licks -= 1;
            log.last_iti_lick = Some(Instant::now());
            self.last = Some(Response {
                port: self.port,
                time_ms: log.tick(),
            });
            return Ok(true);
        }
        let in_response_period = matches!(log.period, Some(Period::Trial | Period::Response));
        let port = match self.answer {
            Answer::Silent => return Ok(false),
            Answer::Premature => self.port,
            _ if !in_response_period => return Ok(false),
            Answer::Correct => self.port,
            Answer::Wrong => self.port % 2 + 1,
        };
        self.last = Some(Response {
            port,
            time_ms: log.tick(),
        });
        Ok(true)
    }

    fn response(&self) -> Option<Response> {
        self.last
    }

    fn is_correct(&self) -> bool {
        self.last.map_or(false, |r| r.port == self.port)
    }

    fn reward(&mut self, _amount: f64) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn punish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn update_history(&mut self, entry: &HistoryEntry) -> anyhow::Result<()> {
        self.log.borrow_mut().history_updates.push(*entry);
        Ok(())
    }

    fn exit(&mut self) -> anyhow::Result<()> {
        self.log.borrow_mut().behavior_exits += 1;
        Ok(())
    }
}

struct MockStimulus(Shared);

impl StimulusAdapter for MockStimulus {
    fn prepare(&mut self, _condition: &Condition, period: Period) -> anyhow::Result<()> {
        let mut log = self.0.borrow_mut();
        log.period = Some(period);
        log.periods.push(period);
        Ok(())
    }

    fn start(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> anyhow::Result<()> {
        self.0.borrow_mut().stimulus_exits += 1;
        Ok(())
    }
}

struct Recorder(Shared);

impl SessionObserver for Recorder {
    fn on_state_entry(&mut self, state: StateId) {
        let mut log = self.0.borrow_mut();
        log.entries.push(state);
        log.entry_times.push((state, Instant::now()));
    }

    fn on_difficulty_change(&mut self, transition: &DifficultyTransition) {
        self.0.borrow_mut().transitions.push(*transition);
    }
}

/// Night once `trials` trials have been logged.
struct NightAfterTrials {
    log: Shared,
    trials: usize,
}

impl WallClock for NightAfterTrials {
    fn time_of_day(&self) -> NaiveTime {
        if self.log.borrow().records.len() >= self.trials {
            hms(23, 0)
        } else {
            hms(12, 0)
        }
    }
}

/// Night until the control status has been polled `polls` times.
struct DayAfterPolls {
    log: Shared,
    polls: usize,
}

impl WallClock for DayAfterPolls {
    fn time_of_day(&self) -> NaiveTime {
        if self.log.borrow().status_polls >= self.polls {
            hms(12, 0)
        } else {
            hms(23, 0)
        }
    }
}

fn hms(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn fast_params(policy: &str) -> SessionParams {
    SessionParams {
        trial_selection: policy.into(),
        status_poll_ms: 1,
        idle_poll_ms: 1,
        hydrate_pause_ms: 0,
        offtime_pause_ms: 0,
        min_reward: 0.0,
        max_reward: 10_000.0,
        seed: Some(7),
        ..SessionParams::default()
    }
}

fn fast_condition(policy: &str, port: u32) -> ConditionParams {
    ConditionParams {
        trial_selection: Some(policy.into()),
        response_port: port,
        reward_amount: 5.0,
        trial_duration: 0,
        intertrial_duration: 0,
        reward_duration: 0,
        punish_duration: 0,
        ..ConditionParams::default()
    }
}

fn conditions(params: &[ConditionParams]) -> Vec<Condition> {
    params
        .iter()
        .cloned()
        .map(|p| Condition::new(p).unwrap())
        .collect()
}

fn rig(plan: &[Answer]) -> (Shared, MockControl, MockBehavior, MockStimulus) {
    let log = Shared::default();
    (
        log.clone(),
        MockControl(log.clone()),
        MockBehavior::new(&log, plan),
        MockStimulus(log.clone()),
    )
}

#[test]
fn history_tracks_every_completed_trial_until_exhaustion() {
    let (log, control, behavior, stimulus) = rig(&[
        Answer::Correct,
        Answer::Wrong,
        Answer::Silent,
        Answer::Correct,
    ]);
    let pool = conditions(&[
        fast_condition("fixed", 1),
        fast_condition("fixed", 1),
        fast_condition("fixed", 2),
        fast_condition("fixed", 2),
    ]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), pool)
        .unwrap()
        .run()
        .unwrap();

    assert!(report.exhausted);
    assert_eq!(report.trials, 4);
    let history = &report.history;
    assert_eq!(history.choices(), &[Some(1), Some(2), None, Some(2)]);
    assert_eq!(history.rewards(), &[Some(5.0), None, None, Some(5.0)]);
    assert_eq!(history.punishes(), &[false, true, false, false]);
    assert_eq!(history.difficulties().len(), 4);
    assert_eq!(report.total_reward, 10.0);

    let log = log.borrow();
    let outcomes: Vec<Option<TrialOutcome>> = log.records.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(TrialOutcome::Reward),
            Some(TrialOutcome::Punish),
            Some(TrialOutcome::Abort),
            Some(TrialOutcome::Reward),
        ]
    );
    assert_eq!(log.history_updates.len(), 4);
    assert_eq!(log.pushed, vec![SetupStatus::Running, SetupStatus::Stop]);
    assert_eq!(log.behavior_exits, 1);
    assert_eq!(log.stimulus_exits, 1);
    assert!(matches!(
        log.events.last(),
        Some(SessionEvent::SessionEnd {
            trials: 4,
            exhausted: true,
            ..
        })
    ));
}

#[test]
fn incremental_punishment_grows_with_the_streak() {
    let (log, control, behavior, stimulus) =
        rig(&[Answer::Wrong, Answer::Wrong, Answer::Wrong]);
    let mut params = fast_condition("fixed", 1);
    params.punish_duration = 1;
    params.incremental_punishment = true;
    let pool = conditions(&[params.clone(), params.clone(), params]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), pool)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.history.punish_streak(), 3);
    let punishments: Vec<(usize, u64)> = log
        .borrow()
        .events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Punishment {
                streak, period_ms, ..
            } => Some((*streak, *period_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(punishments, vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn unknown_policy_forces_exit_and_cleans_up() {
    let (log, control, behavior, stimulus) = rig(&[Answer::Correct]);
    let pool = conditions(&[fast_condition("roundrobin", 1), fast_condition("roundrobin", 2)]);

    let err = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), pool)
        .unwrap()
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Select(SelectError::UnknownPolicy(ref tag)) if tag == "roundrobin"
    ));
    let log = log.borrow();
    assert_eq!(log.records.len(), 1);
    assert_eq!(log.status, SetupStatus::Exit);
    assert_eq!(log.behavior_exits, 1);
    assert_eq!(log.stimulus_exits, 1);
}

#[test]
fn remote_stop_ends_a_running_session() {
    let (log, control, behavior, stimulus) = rig(&[]);
    log.borrow_mut().stop_after_trials = Some(2);
    let mut cond = fast_condition("random", 1);
    cond.intertrial_duration = 20;
    let pool = conditions(&[cond]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("random"), pool)
        .unwrap()
        .run()
        .unwrap();

    assert!(!report.exhausted);
    assert_eq!(report.trials, 2);
    assert_eq!(report.final_status, SetupStatus::Stop);
    assert_eq!(log.borrow().behavior_exits, 1);
}

#[test]
fn hydrate_tops_up_with_free_rewards() {
    let (log, control, behavior, stimulus) = rig(&[Answer::Correct]);
    log.borrow_mut().stop_after_status = Some(SetupStatus::Sleeping);
    let mut params = fast_params("fixed");
    params.min_reward = 20.0;
    params.active_hours = Some(ActiveHours::new(hms(8, 0), hms(20, 0)));
    let mut cond = fast_condition("random", 1);
    cond.intertrial_duration = 1000;
    let pool = conditions(&[cond]);
    let clock = NightAfterTrials {
        log: log.clone(),
        trials: 1,
    };

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .with_wall_clock(clock)
        .run()
        .unwrap();

    assert_eq!(report.trials, 1);
    assert_eq!(report.history.len(), 1);
    assert_eq!(report.total_reward, 5.0);
    assert_eq!(report.free_reward, 15.0);
    assert_eq!(report.history.hydration_total(), 20.0);

    let log = log.borrow();
    let free = log
        .events
        .iter()
        .filter(|e| matches!(e, SessionEvent::FreeReward { .. }))
        .count();
    assert_eq!(free, 3);
    assert!(log.onsets().contains(&StateId::Hydrate));
    assert!(log.pushed.contains(&SetupStatus::Sleeping));
}

#[test]
fn offtime_auto_wakes_when_active_hours_resume() {
    let (log, control, behavior, stimulus) = rig(&[]);
    log.borrow_mut().stop_after_trials = Some(2);
    let mut params = fast_params("random");
    params.auto_wake = true;
    params.active_hours = Some(ActiveHours::new(hms(8, 0), hms(20, 0)));
    let mut cond = fast_condition("random", 1);
    cond.intertrial_duration = 20;
    let pool = conditions(&[cond]);
    let clock = DayAfterPolls {
        log: log.clone(),
        polls: 5,
    };

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .with_wall_clock(clock)
        .run()
        .unwrap();

    assert_eq!(report.trials, 2);
    let log = log.borrow();
    assert_eq!(log.onsets().first(), Some(&StateId::Offtime));
    assert_eq!(
        &log.pushed[..3],
        &[SetupStatus::Running, SetupStatus::Sleeping, SetupStatus::Running]
    );
}

#[test]
fn sleeping_session_waits_for_wakeup_by_default() {
    let (log, control, behavior, stimulus) = rig(&[]);
    log.borrow_mut().stop_after_polls = Some(40);
    let mut params = fast_params("random");
    params.active_hours = Some(ActiveHours::new(hms(8, 0), hms(20, 0)));
    let pool = conditions(&[fast_condition("random", 1)]);
    let clock = DayAfterPolls {
        log: log.clone(),
        polls: 5,
    };

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .with_wall_clock(clock)
        .run()
        .unwrap();

    assert_eq!(report.trials, 0);
    assert_eq!(report.trial_attempts, 0);
    assert_eq!(report.final_status, SetupStatus::Stop);
    let log = log.borrow();
    assert_eq!(log.pushed, vec![SetupStatus::Running, SetupStatus::Sleeping]);
    assert_eq!(log.onsets(), vec![StateId::Offtime]);
}

#[test]
fn wakeup_in_active_hours_resumes_trials() {
    let (log, control, behavior, stimulus) = rig(&[]);
    {
        let mut log = log.borrow_mut();
        log.stop_after_trials = Some(2);
        log.wakeup_after_polls = Some(10);
    }
    let mut params = fast_params("random");
    params.active_hours = Some(ActiveHours::new(hms(8, 0), hms(20, 0)));
    let mut cond = fast_condition("random", 1);
    cond.intertrial_duration = 20;
    let pool = conditions(&[cond]);
    let clock = DayAfterPolls {
        log: log.clone(),
        polls: 5,
    };

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .with_wall_clock(clock)
        .run()
        .unwrap();

    assert_eq!(report.trials, 2);
    let log = log.borrow();
    assert_eq!(log.wakeups, 1);
    assert_eq!(log.onsets().first(), Some(&StateId::Offtime));
    assert_eq!(
        &log.pushed[..3],
        &[SetupStatus::Running, SetupStatus::Sleeping, SetupStatus::Running]
    );
}

#[test]
fn wakeup_at_night_before_hydration_exits() {
    let (log, control, behavior, stimulus) = rig(&[]);
    log.borrow_mut().wakeup_after_polls = Some(3);
    let mut params = fast_params("random");
    params.min_reward = 10.0;
    params.active_hours = Some(ActiveHours::new(hms(8, 0), hms(20, 0)));
    let pool = conditions(&[fast_condition("random", 1)]);
    let clock = DayAfterPolls {
        log: log.clone(),
        polls: usize::MAX,
    };

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .with_wall_clock(clock)
        .run()
        .unwrap();

    assert_eq!(report.trials, 0);
    assert!(!report.exhausted);
    assert_eq!(report.final_status, SetupStatus::Wakeup);
    let log = log.borrow();
    assert_eq!(log.wakeups, 1);
    assert!(log.records.is_empty());
    assert_eq!(log.pushed, vec![SetupStatus::Running, SetupStatus::Sleeping]);
    assert_eq!(log.behavior_exits, 1);
    assert!(matches!(
        log.events.last(),
        Some(SessionEvent::SessionEnd { trials: 0, .. })
    ));
}

#[test]
fn intertrial_licks_restart_the_quiet_interval() {
    let (log, control, behavior, stimulus) = rig(&[Answer::Correct, Answer::Correct]);
    log.borrow_mut().iti_licks = 3;
    let mut cond = fast_condition("fixed", 1);
    cond.noresponse_intertrial = true;
    cond.intertrial_duration = 30;
    let pool = conditions(&[cond.clone(), cond]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), pool)
        .unwrap()
        .with_observer(Recorder(log.clone()))
        .run()
        .unwrap();

    assert_eq!(report.trials, 2);
    assert_eq!(report.history.choices(), &[Some(1), Some(1)]);
    let log = log.borrow();
    assert_eq!(log.iti_licks, 0);
    let times = &log.entry_times;
    let iti = times
        .iter()
        .position(|(state, _)| *state == StateId::InterTrial)
        .expect("inter-trial entered");
    let (_, iti_at) = times[iti];
    let (_, pre_trial_at) = times[iti..]
        .iter()
        .find(|(state, _)| *state == StateId::PreTrial)
        .copied()
        .expect("next trial started");
    // Two lick gaps, then a full quiet interval.
    assert!(
        pre_trial_at.duration_since(iti_at) >= ITI_LICK_GAP * 2 + Duration::from_millis(30),
        "inter-trial lasted {:?}",
        pre_trial_at.duration_since(iti_at)
    );
}

#[test]
fn response_before_trial_ready_aborts() {
    let (log, control, behavior, stimulus) = rig(&[Answer::Correct]);
    log.borrow_mut().ready_limit_ms = Some(500);
    let mut cond = fast_condition("fixed", 1);
    cond.trial_ready = 500;
    cond.trial_duration = 1000;
    let pool = conditions(&[cond]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), pool)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.trials, 1);
    assert_eq!(report.history.choices(), &[None]);
    assert_eq!(report.history.rewards(), &[None]);
    assert_eq!(report.history.punishes(), &[false]);
    let log = log.borrow();
    let record = &log.records[0];
    assert_eq!(record.outcome, Some(TrialOutcome::Abort));
    assert!(!record.in_window);
    assert_eq!(record.response.map(|r| r.port), Some(1));
}

#[test]
fn match_to_sample_runs_cue_delay_then_response() {
    let (log, control, behavior, stimulus) = rig(&[Answer::Correct, Answer::Premature]);
    let mut params = fast_params("fixed");
    params.paradigm = Paradigm::MatchToSample;
    let pool = conditions(&[fast_condition("fixed", 1), fast_condition("fixed", 2)]);

    let report = Experiment::setup(control, behavior, stimulus, params, pool)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.history.rewards(), &[Some(5.0), None]);
    assert_eq!(report.history.choices(), &[Some(1), None]);
    let log = log.borrow();
    assert_eq!(
        log.periods,
        vec![Period::Cue, Period::Delay, Period::Response, Period::Cue]
    );
    let onsets = log.onsets();
    assert!(onsets.contains(&StateId::Cue));
    assert!(onsets.contains(&StateId::Delay));
    assert!(onsets.contains(&StateId::Trial));
    assert_eq!(log.records[1].outcome, Some(TrialOutcome::Abort));
    assert!(!log.records[1].in_window);
}

#[test]
fn staircase_change_reaches_control_and_observers() {
    let (log, control, behavior, stimulus) = rig(&[]);
    log.borrow_mut().stop_after_trials = Some(3);
    let mut easy = fast_condition("staircase", 1);
    easy.staircase_window = 2;
    easy.next_up = 1;
    easy.intertrial_duration = 20;
    let mut hard = easy.clone();
    hard.difficulty = 1;
    let pool = conditions(&[easy, hard]);

    let report = Experiment::setup(control, behavior, stimulus, fast_params("staircase"), pool)
        .unwrap()
        .with_observer(Recorder(log.clone()))
        .run()
        .unwrap();

    assert_eq!(report.final_difficulty, 1);
    assert_eq!(report.history.difficulties(), &[0, 0, 1]);
    let log = log.borrow();
    assert_eq!(log.transitions.len(), 1);
    assert_eq!((log.transitions[0].from, log.transitions[0].to), (0, 1));
    assert!(log.infos.iter().any(|i| i.difficulty == Some(1)));
    assert_eq!(log.entries.first(), Some(&StateId::Prepare));
    assert!(log
        .events
        .iter()
        .any(|e| matches!(e, SessionEvent::DifficultyChange { from: 0, to: 1, .. })));
}

#[test]
fn setup_rejects_empty_pools_and_bad_params() {
    let (_, control, behavior, stimulus) = rig(&[]);
    let err = Experiment::setup(control, behavior, stimulus, fast_params("fixed"), Vec::new())
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::NoConditions));

    let (_, control, behavior, stimulus) = rig(&[]);
    let mut params = fast_params("fixed");
    params.status_poll_ms = 0;
    let pool = conditions(&[fast_condition("fixed", 1)]);
    let err = Experiment::setup(control, behavior, stimulus, params, pool)
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::Config(_)));
}
