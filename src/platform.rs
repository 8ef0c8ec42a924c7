//! Platform-specific bits the heap allocator needs for its fatal-OOM path:
//! a best-effort debugger trap before the process aborts.
//!
//! Arenas here grow incrementally off the process's global allocator rather
//! than pre-reserving one large virtual memory mapping, so there is no
//! mmap/`mach_vm_allocate` wrapper in this module. `libc` is narrowed to the
//! one thing it is still used for: raising SIGTRAP.

/// Best-effort check for whether this process is currently being traced by
/// a debugger. Used to decide whether raising `SIGTRAP` would land in a
/// debugger (pause) or just hit the default disposition (terminate) — we
/// only want the former.
#[cfg(target_os = "linux")]
fn is_being_debugged() -> bool {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status.lines().find_map(|line| {
                line.strip_prefix("TracerPid:")
                    .map(|pid| pid.trim().parse::<u32>().unwrap_or(0) != 0)
            })
        })
        .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn is_being_debugged() -> bool {
    false
}

/// Attempts to trap into an attached debugger. Best-effort and never fatal
/// on its own: if no debugger is attached this is a no-op, so callers on the
/// OOM path remain responsible for actually terminating the process.
#[cfg(unix)]
pub fn debugger_break() {
    if is_being_debugged() {
        unsafe {
            libc::raise(libc::SIGTRAP);
        }
    }
}

#[cfg(windows)]
pub fn debugger_break() {
    extern "system" {
        fn DebugBreak();
        fn IsDebuggerPresent() -> i32;
    }
    unsafe {
        if IsDebuggerPresent() != 0 {
            DebugBreak();
        }
    }
}

#[cfg(not(any(unix, windows)))]
pub fn debugger_break() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debugger_break_does_not_panic_without_debugger() {
        // No debugger is attached under the test harness; raising SIGTRAP
        // with the default disposition must not crash the test process.
        debugger_break();
    }
}
