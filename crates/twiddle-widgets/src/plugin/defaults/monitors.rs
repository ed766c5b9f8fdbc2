#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::converter::{
    Formatter, bool_from_unknown, create_number_formatter, format_string, number_from_unknown,
    string_from_unknown,
};
use twiddle_runtime::params::{Fields, boolean, number, optional, with_default};
use twiddle_runtime::{Params, ParamsError, Unknown};

use super::accept_with;
use crate::constants::{
    MONITOR_DEFAULT_LINE_COUNT, MONITOR_MAX_BUFFER_SIZE, MONITOR_NUMBER_DIGITS,
};
use crate::controller::{MultiLogController, SingleLogController, ValueController};
use crate::plugin::{Acceptance, MonitorBindingHooks, MonitorBindingPlugin, MonitorControllerArgs};

/// Log display settings shared by the default monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogParams {
    pub multiline: bool,
    /// Visible rows of a multi-line log.
    pub line_count: usize,
}

impl LogParams {
    fn parse(f: &Fields<'_>) -> Result<Self, ParamsError> {
        let multiline = f.field("multiline", with_default(boolean(), false))?;
        let line_count = f.field("lineCount", optional(number()))?;
        #[allow(clippy::cast_precision_loss)]
        let max_lines = MONITOR_MAX_BUFFER_SIZE as f64;
        if line_count.is_some_and(|n| n > max_lines) {
            return Err(ParamsError::Invalid {
                key: "lineCount".into(),
                reason: format!("must be at most {MONITOR_MAX_BUFFER_SIZE}"),
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let line_count = line_count
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map_or(MONITOR_DEFAULT_LINE_COUNT, |n| n as usize);
        Ok(Self {
            multiline,
            line_count,
        })
    }

    fn default_buffer_size(&self) -> usize {
        if self.multiline { self.line_count } else { 1 }
    }
}

fn log_controller<T: Clone + 'static>(
    args: MonitorControllerArgs<'_, T, LogParams>,
    formatter: Formatter<T>,
) -> Rc<dyn ValueController> {
    if args.params.multiline || args.buffer_size > 1 {
        Rc::new(MultiLogController::new(
            args.document,
            formatter,
            args.params.line_count,
            args.value.clone(),
            args.view_props,
        ))
    } else {
        Rc::new(SingleLogController::new(
            args.document,
            formatter,
            args.value.clone(),
            args.view_props,
        ))
    }
}

fn accept_if(matches: bool, value: &Unknown, params: &Params) -> Acceptance<LogParams> {
    if matches {
        accept_with(value, params, LogParams::parse)
    } else {
        Acceptance::Rejected
    }
}

#[must_use]
pub fn boolean_monitor() -> MonitorBindingPlugin<bool, LogParams> {
    MonitorBindingPlugin {
        id: "monitor-bool",
        accept: |value, params| accept_if(value.is_boolean(), value, params),
        binding: MonitorBindingHooks {
            reader: |_| Rc::new(bool_from_unknown),
            default_buffer_size: LogParams::default_buffer_size,
        },
        controller: |args| log_controller(args, Formatter::new(|b: &bool| b.to_string())),
    }
}

#[must_use]
pub fn number_monitor() -> MonitorBindingPlugin<f64, LogParams> {
    MonitorBindingPlugin {
        id: "monitor-number",
        accept: |value, params| accept_if(value.is_number(), value, params),
        binding: MonitorBindingHooks {
            reader: |_| Rc::new(number_from_unknown),
            default_buffer_size: LogParams::default_buffer_size,
        },
        controller: |args| log_controller(args, create_number_formatter(MONITOR_NUMBER_DIGITS)),
    }
}

#[must_use]
pub fn string_monitor() -> MonitorBindingPlugin<String, LogParams> {
    MonitorBindingPlugin {
        id: "monitor-string",
        accept: |value, params| accept_if(value.is_string(), value, params),
        binding: MonitorBindingHooks {
            reader: |_| Rc::new(string_from_unknown),
            default_buffer_size: LogParams::default_buffer_size,
        },
        controller: |args| log_controller(args, format_string()),
    }
}
