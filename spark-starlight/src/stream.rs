use hashbrown::HashMap;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-session streaming state: drops frames that arrive faster than the
/// throttle interval and mutes an unchanged instruction until the repeat
/// interval has passed.
#[derive(Debug, Clone)]
pub struct FrameGate {
    throttle: Duration,
    repeat: Duration,
    last_frame: Option<Instant>,
    last_spoken: Option<(String, Instant)>,
    last_seen: Instant,
}

impl FrameGate {
    pub fn new(throttle: Duration, repeat: Duration, now: Instant) -> Self {
        Self {
            throttle,
            repeat,
            last_frame: None,
            last_spoken: None,
            last_seen: now,
        }
    }

    /// Whether a frame arriving at `now` should be processed.
    pub fn admit_frame(&mut self, now: Instant) -> bool {
        self.last_seen = now;
        match self.last_frame {
            Some(last) if now.saturating_duration_since(last) < self.throttle => false,
            _ => {
                self.last_frame = Some(now);
                true
            }
        }
    }

    /// Whether `instruction` should be spoken. A new instruction always is.
    pub fn should_speak(&mut self, instruction: &str, now: Instant) -> bool {
        if let Some((last, at)) = &self.last_spoken {
            if last == instruction && now.saturating_duration_since(*at) < self.repeat {
                return false;
            }
        }
        self.last_spoken = Some((instruction.to_string(), now));
        true
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }
}

/// What happened to one streamed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAdmission {
    Throttled,
    Accepted,
}

/// Frame gates of every live stream session.
#[derive(Debug)]
pub struct StreamSessions {
    throttle: Duration,
    repeat: Duration,
    gates: Mutex<HashMap<String, FrameGate>>,
}

impl StreamSessions {
    pub fn new(throttle: Duration, repeat: Duration) -> Self {
        Self {
            throttle,
            repeat,
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn admit(&self, session: &str, now: Instant) -> FrameAdmission {
        let mut gates = self.gates.lock();
        let gate = gates.entry_ref(session).or_insert_with(|| {
            info!("Stream session '{}' opened", session);
            FrameGate::new(self.throttle, self.repeat, now)
        });
        if gate.admit_frame(now) {
            FrameAdmission::Accepted
        } else {
            debug!("Throttled frame for session '{}'", session);
            FrameAdmission::Throttled
        }
    }

    /// Repeat suppression for an admitted frame. Unknown sessions always speak.
    pub fn should_speak(&self, session: &str, instruction: &str, now: Instant) -> bool {
        self.gates
            .lock()
            .get_mut(session)
            .map_or(true, |gate| gate.should_speak(instruction, now))
    }

    pub fn close(&self, session: &str) -> bool {
        let removed = self.gates.lock().remove(session).is_some();
        if removed {
            info!("Stream session '{}' closed", session);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.gates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops sessions idle for at least `idle`. Returns how many were dropped.
    pub fn evict_idle(&self, idle: Duration, now: Instant) -> usize {
        let mut gates = self.gates.lock();
        let before = gates.len();
        gates.retain(|_, gate| gate.idle_for(now) < idle);
        before - gates.len()
    }
}

/// Periodically evicts idle sessions. Runs until the runtime shuts down.
pub async fn run_eviction(sessions: Arc<StreamSessions>, idle: Duration) {
    let mut interval = tokio::time::interval(idle.max(Duration::from_secs(1)));
    loop {
        interval.tick().await;
        let evicted = sessions.evict_idle(idle, Instant::now());
        if evicted > 0 {
            info!("Evicted {} idle stream sessions", evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THROTTLE: Duration = Duration::from_millis(300);
    const REPEAT: Duration = Duration::from_secs(2);

    #[test]
    fn test_throttle() {
        let start = Instant::now();
        let mut gate = FrameGate::new(THROTTLE, REPEAT, start);
        assert!(gate.admit_frame(start));
        assert!(!gate.admit_frame(start + Duration::from_millis(100)));
        assert!(!gate.admit_frame(start + Duration::from_millis(299)));
        assert!(gate.admit_frame(start + Duration::from_millis(300)));
        // The throttle counts from the last admitted frame.
        assert!(!gate.admit_frame(start + Duration::from_millis(500)));
        assert!(gate.admit_frame(start + Duration::from_millis(650)));
    }

    #[test]
    fn test_repeat_suppression() {
        let start = Instant::now();
        let mut gate = FrameGate::new(THROTTLE, REPEAT, start);
        assert!(gate.should_speak("Move center (clear).", start));
        assert!(!gate.should_speak("Move center (clear).", start + Duration::from_secs(1)));
        assert!(gate.should_speak("Turn left.", start + Duration::from_millis(1500)));
        assert!(gate.should_speak("Move center (clear).", start + Duration::from_millis(1600)));
        assert!(gate.should_speak("Move center (clear).", start + Duration::from_millis(3600)));
    }

    #[test]
    fn test_sessions_are_independent() {
        let start = Instant::now();
        let sessions = StreamSessions::new(THROTTLE, REPEAT);
        assert_eq!(sessions.admit("a", start), FrameAdmission::Accepted);
        assert_eq!(sessions.admit("b", start), FrameAdmission::Accepted);
        assert_eq!(
            sessions.admit("a", start + Duration::from_millis(10)),
            FrameAdmission::Throttled
        );
        assert_eq!(sessions.len(), 2);
        assert!(sessions.close("a"));
        assert!(!sessions.close("a"));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_evict_idle() {
        let start = Instant::now();
        let sessions = StreamSessions::new(THROTTLE, REPEAT);
        sessions.admit("old", start);
        sessions.admit("fresh", start + Duration::from_secs(50));

        let evicted = sessions.evict_idle(Duration::from_secs(60), start + Duration::from_secs(70));
        assert_eq!(evicted, 1);
        assert_eq!(sessions.len(), 1);
        assert!(sessions.should_speak("fresh", "Go.", start + Duration::from_secs(70)));
    }
}
