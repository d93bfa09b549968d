// src/pipeline/compare.rs

//! Clanmate comparison report.
//!
//! Walks every PGCR entry against every linked profile of every clanmate and
//! prints the shared activities. Report lines go to stdout; everything else
//! in the application logs to stderr.

use log::info;

use crate::models::{LinkedProfiles, PgcrReport};

/// Print activities shared with clanmates. `limit` of zero lists all
/// matches; otherwise reporting stops after that many.
///
/// Returns the number of matches printed.
pub fn report_shared_activities(
    reports: &[PgcrReport],
    clanmates: &[LinkedProfiles],
    limit: usize,
) -> usize {
    info!("Showing games with teammates...");

    let mut counter = 0;

    for report in reports {
        for entry in &report.entries {
            let participant_id = &entry.player.destiny_user_info.membership_id;

            for clanmate in clanmates {
                for profile in &clanmate.profiles {
                    if participant_id == &profile.membership_id {
                        println!(
                            "[{}] Activity {} has clanmate {}",
                            report.period,
                            report.activity_details.instance_id,
                            profile.display_name
                        );

                        counter += 1;
                        if limit != 0 && counter >= limit {
                            return counter;
                        }
                    }
                }
            }
        }
    }

    counter
}
