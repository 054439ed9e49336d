use std::{path::PathBuf, time::Duration};

use tokio::time::sleep;

use crate::{
    config::Settings,
    domain::{FailedTransfer, GroupHandle, MemberFilter, MemberRecord, TransferReport},
    errors::GatewayError,
    events::{Event, Question},
    paths::Paths,
    ports::{ActiveSession, Console, TelegramGateway},
    scraper::{load_members, scrape_resolved},
    utils::{file_stamp, iso_timestamp_local, write_json_pretty},
    Result,
};

/// Consecutive rate-limit waits tolerated for one member before it is
/// recorded as failed.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Where the members to invite come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberSource {
    /// A previous member export. A missing file falls back to a fresh scrape.
    File(PathBuf),
    Scrape { filter: MemberFilter },
}

#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub source: String,
    pub target: String,
    pub members: MemberSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed {
        report: TransferReport,
        report_path: PathBuf,
    },
    NoMembers,
    Cancelled,
}

#[derive(Debug, Default)]
struct Tally {
    transferred: usize,
    failed: Vec<FailedTransfer>,
}

/// Invite the source group's members into the target group, one at a time.
///
/// Resolution failures abort before anything is written. Per-member failures
/// are collected into the report; rate limits suspend and retry the member.
pub async fn transfer(
    session: &ActiveSession,
    console: &dyn Console,
    paths: &Paths,
    settings: &Settings,
    req: TransferRequest,
) -> Result<TransferOutcome> {
    let gateway = session.gateway();

    console.report(Event::ResolvingGroup);
    let source = gateway.resolve_group(&req.source).await?;
    let target = gateway.resolve_group(&req.target).await?;
    console.report(Event::SourceGroup {
        title: source.title.clone(),
    });
    console.report(Event::TargetGroup {
        title: target.title.clone(),
    });

    let members = obtain_members(gateway, console, paths, &source, &req.members).await?;
    if members.is_empty() {
        console.report(Event::NoMembersToTransfer);
        return Ok(TransferOutcome::NoMembers);
    }

    let confirmed = console
        .confirm(Question::ConfirmTransfer {
            count: members.len(),
        })
        .await?;
    if !confirmed {
        console.report(Event::TransferCancelled);
        return Ok(TransferOutcome::Cancelled);
    }

    tracing::info!(
        source_id = source.id,
        target_id = target.id,
        members = members.len(),
        "transfer started"
    );
    let tally = invite_all(gateway, console, &target, &members, settings.delay()).await;

    let report = TransferReport {
        source_group: req.source,
        target_group: req.target,
        total_members: members.len(),
        transferred: tally.transferred,
        failed: tally.failed.len(),
        failed_details: tally.failed,
        transfer_date: iso_timestamp_local(),
    };
    let report_path = paths.transfer_report(&file_stamp());
    write_json_pretty(&report_path, &report)?;

    tracing::info!(
        transferred = report.transferred,
        failed = report.failed,
        report = %report_path.display(),
        "transfer finished"
    );
    console.report(Event::TransferComplete {
        transferred: report.transferred,
        failed: report.failed,
        report: report_path.clone(),
    });

    Ok(TransferOutcome::Completed {
        report,
        report_path,
    })
}

async fn obtain_members(
    gateway: &dyn TelegramGateway,
    console: &dyn Console,
    paths: &Paths,
    source: &GroupHandle,
    from: &MemberSource,
) -> Result<Vec<MemberRecord>> {
    let filter = match from {
        MemberSource::File(path) if path.exists() => {
            let members = load_members(path)?;
            console.report(Event::MembersLoaded {
                count: members.len(),
                path: path.clone(),
            });
            return Ok(members);
        }
        MemberSource::File(path) => {
            console.report(Event::MembersFileMissing { path: path.clone() });
            MemberFilter::All
        }
        MemberSource::Scrape { filter } => *filter,
    };

    scrape_resolved(gateway, console, paths, source, filter, 0).await
}

async fn invite_all(
    gateway: &dyn TelegramGateway,
    console: &dyn Console,
    target: &GroupHandle,
    members: &[MemberRecord],
    delay: Duration,
) -> Tally {
    let total = members.len();
    let mut tally = Tally::default();

    for (idx, member) in members.iter().enumerate() {
        let position = idx + 1;

        let Some(access_hash) = member.access_hash else {
            record_failure(
                console,
                &mut tally,
                member,
                GatewayError::Other("member has no access_hash".to_string()),
            );
            continue;
        };

        let mut waits = 0u32;
        loop {
            match gateway.invite(target, member.id, access_hash).await {
                Ok(()) => {
                    tally.transferred += 1;
                    console.report(Event::MemberTransferred {
                        position,
                        total,
                        name: member.display_name(),
                    });
                    if position < total {
                        sleep(delay).await;
                    }
                    break;
                }
                Err(GatewayError::RateLimited { seconds }) if waits < MAX_RATE_LIMIT_RETRIES => {
                    waits += 1;
                    tracing::warn!(user_id = member.id, seconds, attempt = waits, "rate limited");
                    console.report(Event::RateLimited { seconds });
                    sleep(Duration::from_secs(seconds)).await;
                }
                Err(e) => {
                    record_failure(console, &mut tally, member, e);
                    break;
                }
            }
        }
    }

    tally
}

fn record_failure(console: &dyn Console, tally: &mut Tally, member: &MemberRecord, e: GatewayError) {
    let error = e.to_string();
    tracing::warn!(user_id = member.id, error = %error, "invite failed");
    console.report(Event::MemberFailed {
        name: member.display_name(),
        error: error.clone(),
        precondition: e.is_precondition(),
    });
    tally.failed.push(FailedTransfer {
        member: member.clone(),
        error,
    });
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use tokio::time::Instant;

    use super::*;
    use crate::{
        ports::NoticeKind,
        testing::{group, session, tmp_dir, user, FakeGateway, RecordingConsole},
        Error,
    };

    fn settings(delay_secs: u64) -> Settings {
        Settings {
            delay_between_requests: delay_secs,
            ..Default::default()
        }
    }

    fn gateway(n: i64) -> FakeGateway {
        let mut gw = FakeGateway::default()
            .with_group("src", group(1, "Source"))
            .with_group("dst", group(2, "Target"));
        gw.participants = (1..=n).map(|i| user(100 + i, &format!("m{i}"))).collect();
        gw
    }

    fn request(members: MemberSource) -> TransferRequest {
        TransferRequest {
            source: "src".to_string(),
            target: "dst".to_string(),
            members,
        }
    }

    fn completed(outcome: TransferOutcome) -> (TransferReport, PathBuf) {
        match outcome {
            TransferOutcome::Completed {
                report,
                report_path,
            } => (report, report_path),
            other => panic!("expected completed transfer, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn all_invites_succeed() {
        let gw = Arc::new(gateway(4));
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-ok");
        let paths = Paths::new(&root);

        let started = Instant::now();
        let outcome = transfer(
            &session(&gw),
            &console,
            &paths,
            &settings(2),
            request(MemberSource::Scrape {
                filter: MemberFilter::All,
            }),
        )
        .await
        .unwrap();

        // Three gaps between four invites, none after the last one.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        let (report, report_path) = completed(outcome);
        assert_eq!(report.total_members, 4);
        assert_eq!(report.transferred, 4);
        assert_eq!(report.failed, 0);
        assert!(report.failed_details.is_empty());
        assert_eq!(gw.invited_ids(), [101, 102, 103, 104]);

        let on_disk: TransferReport =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(on_disk, report);
        assert!(report_path.starts_with(&paths.logs_dir));
        assert_eq!(
            console.questions.lock().unwrap().as_slice(),
            [Question::ConfirmTransfer { count: 4 }]
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn privacy_failure_is_recorded_and_loop_continues() {
        let gw = Arc::new(gateway(5));
        gw.script_invite(
            103,
            vec![Err(GatewayError::PrivacyRestricted(
                "USER_PRIVACY_RESTRICTED".to_string(),
            ))],
        );
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-privacy");
        let paths = Paths::new(&root);

        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(1),
                request(MemberSource::Scrape {
                    filter: MemberFilter::All,
                }),
            )
            .await
            .unwrap(),
        );

        assert_eq!(report.transferred, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_details.len(), 1);
        assert_eq!(report.failed_details[0].member.id, 103);
        assert!(report.failed_details[0]
            .error
            .contains("USER_PRIVACY_RESTRICTED"));

        let failed_event = console
            .events()
            .into_iter()
            .find(|e| matches!(e, Event::MemberFailed { .. }))
            .unwrap();
        assert_eq!(failed_event.kind(), NoticeKind::Warning);

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_waits_then_retries_same_member() {
        let gw = Arc::new(gateway(3));
        gw.script_invite(102, vec![Err(GatewayError::RateLimited { seconds: 30 })]);
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-flood");
        let paths = Paths::new(&root);

        let started = Instant::now();
        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(2),
                request(MemberSource::Scrape {
                    filter: MemberFilter::All,
                }),
            )
            .await
            .unwrap(),
        );
        let elapsed = started.elapsed();

        // 30s wait + two inter-invite delays of 2s.
        assert_eq!(elapsed, Duration::from_secs(34));
        assert_eq!(report.transferred, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(gw.invited_ids(), [101, 102, 102, 103]);
        assert!(console
            .events()
            .contains(&Event::RateLimited { seconds: 30 }));

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn each_failure_kind_is_recorded_without_delay() {
        let gw = Arc::new(gateway(4));
        gw.script_invite(
            102,
            vec![Err(GatewayError::NotParticipant("USER_NOT_PARTICIPANT".to_string()))],
        );
        gw.script_invite(
            103,
            vec![Err(GatewayError::ChannelPrivate("CHANNEL_PRIVATE".to_string()))],
        );
        gw.script_invite(
            104,
            vec![Err(GatewayError::Other("CHAT_ADMIN_REQUIRED".to_string()))],
        );
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-kinds");
        let paths = Paths::new(&root);

        let started = Instant::now();
        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(3),
                request(MemberSource::Scrape {
                    filter: MemberFilter::All,
                }),
            )
            .await
            .unwrap(),
        );

        // Only the one success (not last) is followed by the delay.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(report.transferred, 1);
        assert_eq!(report.failed, 3);
        let failed: Vec<(i64, &str)> = report
            .failed_details
            .iter()
            .map(|f| (f.member.id, f.error.as_str()))
            .collect();
        assert_eq!(failed[0].0, 102);
        assert!(failed[0].1.contains("USER_NOT_PARTICIPANT"));
        assert_eq!(failed[1].0, 103);
        assert!(failed[1].1.contains("CHANNEL_PRIVATE"));
        assert_eq!(failed[2], (104, "CHAT_ADMIN_REQUIRED"));

        let kinds: Vec<NoticeKind> = console
            .events()
            .iter()
            .filter(|e| matches!(e, Event::MemberFailed { .. }))
            .map(Event::kind)
            .collect();
        assert_eq!(
            kinds,
            [NoticeKind::Warning, NoticeKind::Warning, NoticeKind::Error]
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_rate_limit_is_recorded_once() {
        let gw = Arc::new(gateway(2));
        gw.script_invite(
            101,
            vec![Err(GatewayError::RateLimited { seconds: 5 }); 4],
        );
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-flood-cap");
        let paths = Paths::new(&root);

        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(0),
                request(MemberSource::Scrape {
                    filter: MemberFilter::All,
                }),
            )
            .await
            .unwrap(),
        );

        assert_eq!(report.transferred, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.transferred + report.failed, report.total_members);
        assert_eq!(report.failed_details[0].member.id, 101);
        assert_eq!(gw.invited_ids(), [101, 101, 101, 101, 102]);

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn loads_members_from_export_in_order() {
        let root = tmp_dir("tss-transfer-file");
        let paths = Paths::new(&root);
        let members: Vec<MemberRecord> = [7, 3, 9]
            .into_iter()
            .map(|id| MemberRecord::from_participant(user(id, "f"), "2026-01-01T00:00:00"))
            .collect();
        let file = root.join("members.json");
        write_json_pretty(&file, &members).unwrap();

        // No participants in the gateway: the list must come from the file.
        let gw = Arc::new(gateway(0));
        let console = RecordingConsole::answering(&["y"]);

        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(0),
                request(MemberSource::File(file.clone())),
            )
            .await
            .unwrap(),
        );

        assert_eq!(report.transferred, 3);
        assert_eq!(gw.invited_ids(), [7, 3, 9]);
        assert_eq!(load_members(&file).unwrap(), members);
        assert!(console.events().contains(&Event::MembersLoaded {
            count: 3,
            path: file.clone(),
        }));

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn declining_confirmation_has_no_side_effects() {
        let gw = Arc::new(gateway(2));
        let console = RecordingConsole::answering(&["n"]);
        let root = tmp_dir("tss-transfer-decline");
        let paths = Paths::new(&root);

        let outcome = transfer(
            &session(&gw),
            &console,
            &paths,
            &settings(0),
            request(MemberSource::Scrape {
                filter: MemberFilter::All,
            }),
        )
        .await
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Cancelled);
        assert!(gw.invited_ids().is_empty());
        assert!(!paths.logs_dir.exists());

        let _ = fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn unresolvable_target_aborts_without_report() {
        let gw = Arc::new(gateway(2));
        let console = RecordingConsole::answering(&["y"]);
        let root = tmp_dir("tss-transfer-missing");
        let paths = Paths::new(&root);

        let err = transfer(
            &session(&gw),
            &console,
            &paths,
            &settings(0),
            TransferRequest {
                source: "src".to_string(),
                target: "nowhere".to_string(),
                members: MemberSource::Scrape {
                    filter: MemberFilter::All,
                },
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Gateway(GatewayError::GroupNotFound(_))
        ));
        assert!(gw.invited_ids().is_empty());
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn empty_member_list_is_reported() {
        let gw = Arc::new(gateway(0));
        let console = RecordingConsole::default();
        let root = tmp_dir("tss-transfer-empty");
        let paths = Paths::new(&root);

        let outcome = transfer(
            &session(&gw),
            &console,
            &paths,
            &settings(0),
            request(MemberSource::Scrape {
                filter: MemberFilter::All,
            }),
        )
        .await
        .unwrap();

        assert_eq!(outcome, TransferOutcome::NoMembers);
        assert!(console.events().contains(&Event::NoMembersToTransfer));
        assert!(console.questions.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_access_hash_is_a_failure() {
        let gw = Arc::new(gateway(0));
        let root = tmp_dir("tss-transfer-nohash");
        let paths = Paths::new(&root);
        let mut member = MemberRecord::from_participant(user(5, "x"), "");
        member.access_hash = None;
        let file = root.join("members.json");
        write_json_pretty(&file, &vec![member]).unwrap();
        let console = RecordingConsole::answering(&["y"]);

        let (report, _) = completed(
            transfer(
                &session(&gw),
                &console,
                &paths,
                &settings(0),
                request(MemberSource::File(file)),
            )
            .await
            .unwrap(),
        );

        assert_eq!(report.failed, 1);
        assert!(gw.invited_ids().is_empty());

        let _ = fs::remove_dir_all(&root);
    }
}
