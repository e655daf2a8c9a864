mod decision;
mod preferences;
mod session;
mod transcript;
mod types;

use anyhow::Result;
use session::Session;
use std::io::{self, Read};
use std::process;
use types::{HookInput, HookOutput};

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn main() {
    // Malformed or unreadable input is a silent success: this runs as a
    // background hook and must never surface noise for bad payloads.
    let input = match read_stdin() {
        Ok(s) => s,
        Err(_) => return,
    };
    let hook_input: HookInput = match serde_json::from_str(&input) {
        Ok(h) => h,
        Err(_) => return,
    };

    let result: Result<Option<HookOutput>> = match &hook_input {
        HookInput::Stop(e) => {
            // Re-entrancy guard: if the review continuation triggered this
            // stop, bail before any state is read to avoid a feedback loop.
            if e.stop_hook_active
                || e.common.session_id.is_empty()
                || e.common.transcript_path.is_empty()
            {
                Ok(None)
            } else {
                Session::open(&e.common.session_id).and_then(|s| s.handle_stop(e))
            }
        }
        HookInput::SessionEnd(e) => {
            if e.common.session_id.is_empty() {
                Ok(None)
            } else {
                Session::open(&e.common.session_id).and_then(|s| s.handle_session_end(e))
            }
        }
        _ => Ok(None),
    };

    match result {
        Ok(Some(output)) => {
            println!(
                "{}",
                serde_json::to_string(&output).expect("Failed to serialize output")
            );
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("rulewatch: {err:#}");
            process::exit(2);
        }
    }
}
