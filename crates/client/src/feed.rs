use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use hexmotion::{Action, ActionPacket, HecsCoord, MotionConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const DEMO_ACTOR_ID: i32 = 1;

/// Plays back a JSON-lines capture of server action packets. Blank lines
/// and lines starting with `#` are skipped.
pub async fn replay_file(path: PathBuf, tx: mpsc::Sender<ActionPacket>) -> anyhow::Result<()> {
    let file = tokio::fs::File::open(&path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut sent = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match ActionPacket::from_json(line) {
            Ok(packet) => {
                if tx.send(packet).await.is_err() {
                    break;
                }
                sent += 1;
            }
            Err(e) => log::warn!("skipping packet line: {e}"),
        }
    }

    log::info!("replayed {} packets from {}", sent, path.display());
    Ok(())
}

/// Fake server traffic: one follower walks a lap around a hexagon, fades out
/// and is removed.
pub async fn demo_feed(
    tx: mpsc::Sender<ActionPacket>,
    motion: MotionConfig,
    start: HecsCoord,
) -> anyhow::Result<()> {
    let expiration = || motion.expiration_from(SystemTime::now());
    let step = Duration::try_from_secs_f32(motion.walk_duration_s + motion.turn_duration_s)
        .unwrap_or_default();

    let mut script = vec![Action::init_at(start, 0.0, expiration())];
    let mut heading = 60.0_f32;
    script.push(Action::turn(60.0, motion.turn_duration_s, expiration()));
    for _ in 0..6 {
        script.push(Action::walk(
            HecsCoord::ORIGIN.neighbor_at_heading(heading),
            motion.walk_duration_s,
            expiration(),
        ));
        script.push(Action::turn(60.0, motion.turn_duration_s, expiration()));
        heading += 60.0;
    }
    script.push(Action::fade(-1.0, 1.0, expiration()));
    script.push(Action::death(expiration()));

    for (i, action) in script.iter().enumerate() {
        if tx.send(action.packet(DEMO_ACTOR_ID)).await.is_err() {
            break;
        }
        // Send roughly in step with playback, like a live server would.
        if i % 2 == 0 {
            tokio::time::sleep(step).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_feed_ends_with_death() {
        let (tx, mut rx) = mpsc::channel(64);
        let motion = MotionConfig {
            walk_duration_s: 0.0,
            turn_duration_s: 0.0,
            ..Default::default()
        };
        demo_feed(tx, motion, HecsCoord::from_offset_coordinates(4, 4))
            .await
            .unwrap();

        let mut packets = Vec::new();
        while let Some(packet) = rx.recv().await {
            packets.push(packet);
        }
        assert_eq!(packets.len(), 16);
        assert_eq!(packets[0].displacement, HecsCoord::from_offset_coordinates(4, 4));
        assert!(packets.iter().all(|p| p.id == DEMO_ACTOR_ID));
        assert_eq!(
            packets.last().map(|p| p.action_type),
            Some(hexmotion::ActionType::Death)
        );
    }
}
