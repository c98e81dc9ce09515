use chrono::Utc;
use uuid::Uuid;

/// Anything that can hand out fresh node ids
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Node id generator for one editing session
///
/// Ids look like `"{seed}-{count}"` where the seed is the session start time
/// (base36 milliseconds) plus a random suffix, so ids minted by different
/// sessions do not collide and ids within a session are strictly sequential.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random = Uuid::new_v4().simple().to_string();
        Self {
            seed: format!("{}{}", to_base36(millis), &random[..6]),
            count: 0,
        }
    }

    /// Deterministic generator (tests, replays)
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
