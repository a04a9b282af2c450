/// ----- DEBUG MODULE -----
/// Redraws a small status table in place so the state of the platform can
/// be watched while the controller runs.

use std::io::{stdout, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, tick};
use crossterm::{cursor, terminal, ExecutableCommand, Result};

use crate::controller::Controller;

const STATUS_SIZE: u16 = 9;
const REDRAW_PERIOD: Duration = Duration::from_millis(250);

pub fn main(controller: Arc<Controller>) -> Result<()> {
    let mut stdout = stdout();
    let redraw = tick(REDRAW_PERIOD);

    for _ in 0..STATUS_SIZE { writeln!(stdout, "")?; }

    loop {
        select! {
            recv(redraw) -> _ => {
                printstatus(&mut stdout, &controller)?;
            },
        }
    }
}

fn printstatus(stdout: &mut Stdout, controller: &Controller) -> Result<()> {
    let status = controller.status();

    stdout.execute(cursor::MoveUp(STATUS_SIZE))?;
    stdout.execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;

    writeln!(stdout, "+-------------------------+")?;
    writeln!(stdout, "| DUMBWAITER              |")?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "DIRECTION", status.direction.as_string())?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "AT FLOOR", status.last_seen_floor)?;
    writeln!(stdout, "+------------+------------+")?;
    writeln!(stdout, "| {0:<10} | {1:<10} |", "REQUESTED", status.requested_floor)?;
    writeln!(stdout, "+------------+------------+")?;

    Ok(())
}
