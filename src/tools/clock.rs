use super::{Tool, ToolDescriptor};
use chrono::{Local, NaiveDateTime};
use serde_json::{Map, Value};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local time of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Current date and time as `YYYY-MM-DD HH:MM:SS`
pub fn current_time(clock: &dyn Clock) -> String {
    clock.now().format(TIME_FORMAT).to_string()
}

pub struct CurrentTimeTool {
    clock: Box<dyn Clock>,
}

impl CurrentTimeTool {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
        }
    }
}

impl Default for CurrentTimeTool {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl Tool for CurrentTimeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_current_time".to_string(),
            description: "Get the current date and time.".to_string(),
            parameters: vec![],
            returns: "A string with the current date and time.".to_string(),
        }
    }

    fn invoke(&self, _args: &Map<String, Value>) -> String {
        current_time(self.clock.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap(),
        )
    }

    #[test]
    fn test_current_time_format() {
        assert_eq!(current_time(&at(2024, 3, 7, 9, 5, 1)), "2024-03-07 09:05:01");
        assert_eq!(current_time(&at(1999, 12, 31, 23, 59, 59)), "1999-12-31 23:59:59");
    }

    #[test]
    fn test_tool_uses_injected_clock() {
        let tool = CurrentTimeTool::new(at(2030, 1, 1, 0, 0, 0));
        assert_eq!(tool.invoke(&Map::new()), "2030-01-01 00:00:00");
        assert!(tool.descriptor().parameters.is_empty());
    }

    #[test]
    fn test_system_clock_has_fixed_width() {
        assert_eq!(current_time(&SystemClock).len(), 19);
    }
}
