//! アップロードのライフサイクル制御
//!
//! 状態は `Idle` → `Uploading` → `Succeeded` | `Failed` → (reset) → `Idle`。
//! 検証は `select` 内で同期的に終わるため独立した状態を持たない。
//!
//! 送信は3段に分かれる:
//! 1. [`UploadController::begin_submit`] で状態を `Uploading` にし、[`Submission`] を得る
//! 2. [`Submission::send`] で実際にPOSTする（コントローラを借用しない）
//! 3. [`UploadController::complete`] で結果を反映する
//!
//! UI側はリアクティブな状態を `await` 越しに借用できないため、この分割になっている。
//! 1ページにつき同時に送信できるのは1件のみ。チケット番号が最新でない完了は捨てる。

use super::selection::Selection;
use crate::api::{self, AnalyticsEvent, ApiClient, AttemptOutcome, NETWORK_FAILURE_MESSAGE};
use crate::demos::DemoSpec;
use crate::error::{Error, Result, TransportError};
use crate::http::{FileSource, FormPart, HttpClient, HttpReply};
use crate::notice::Notice;
use crate::payload::{self, ResultPayload};
use futures::future::{AbortHandle, AbortRegistration, Abortable};

/// 結果JSONが想定外の形だったときの表示文言
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "The server returned an unexpected response";

#[derive(Debug, Clone, PartialEq)]
pub enum UploadPhase<R> {
    Idle,
    Uploading,
    Succeeded(R),
    Failed(String),
}

/// 送信中リクエストの中断ハンドル
#[derive(Debug)]
pub struct RequestHandle {
    ticket: u64,
    abort: AbortHandle,
}

impl RequestHandle {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// 中断する。ハンドルを消費するので二重に呼べない
    fn cancel(self) {
        self.abort.abort();
    }
}

/// 送信1回分（コントローラから切り離して `await` できる）
#[derive(Debug)]
pub struct Submission<F> {
    ticket: u64,
    endpoint: &'static str,
    parts: Vec<FormPart<F>>,
    registration: AbortRegistration,
}

impl<F: FileSource + Clone> Submission<F> {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn parts(&self) -> &[FormPart<F>] {
        &self.parts
    }

    /// POSTして完了を返す。途中で中断されたら `Outcome::Aborted`
    pub async fn send<C>(self, api: &ApiClient<C>) -> Completion
    where
        C: HttpClient<File = F>,
    {
        let request = api.post_files(self.endpoint, self.parts);
        let outcome = match Abortable::new(request, self.registration).await {
            Ok(Ok(reply)) => Outcome::Reply(reply),
            Ok(Err(e)) => Outcome::Transport(e),
            Err(_) => Outcome::Aborted,
        };
        Completion {
            ticket: self.ticket,
            outcome,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Reply(HttpReply),
    Transport(TransportError),
    Aborted,
}

/// 送信の完了通知
#[derive(Debug)]
pub struct Completion {
    pub ticket: u64,
    pub outcome: Outcome,
}

/// デモ1ページ分のアップロード状態
#[derive(Debug)]
pub struct UploadController<F, R> {
    demo: &'static DemoSpec,
    selection: Selection<F>,
    phase: UploadPhase<R>,
    in_flight: Option<RequestHandle>,
    next_ticket: u64,
    torn_down: bool,
    notices: Vec<Notice>,
}

impl<F, R> UploadController<F, R>
where
    F: FileSource + Clone,
    R: ResultPayload,
{
    pub fn new(demo: &'static DemoSpec) -> Self {
        Self {
            demo,
            selection: Selection::new(),
            phase: UploadPhase::Idle,
            in_flight: None,
            next_ticket: 1,
            torn_down: false,
            notices: Vec::new(),
        }
    }

    pub fn demo(&self) -> &'static DemoSpec {
        self.demo
    }

    pub fn phase(&self) -> &UploadPhase<R> {
        &self.phase
    }

    pub fn selection(&self) -> &Selection<F> {
        &self.selection
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, UploadPhase::Uploading)
    }

    pub fn result(&self) -> Option<&R> {
        match &self.phase {
            UploadPhase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            UploadPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// 溜まった通知を取り出す
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn reject(&mut self, message: String) -> Error {
        log::debug!("{}: input rejected: {}", self.demo.id, message);
        self.notices.push(Notice::error(message.clone()));
        Error::InputRejected(message)
    }

    /// 枠にファイルを選択する
    ///
    /// 1つでも検証NGなら選択は変えずにエラー。成功すると以前の結果・エラーは消える。
    /// 空の `files` は枠のクリアと同じ。
    pub fn select(&mut self, field: &str, files: Vec<F>) -> Result<()> {
        if self.is_uploading() {
            return Err(Error::Busy);
        }
        let Some(slot) = self.demo.slot(field) else {
            return Err(self.reject(format!("Unknown upload field: {}", field)));
        };
        if !slot.multiple && files.len() > 1 {
            return Err(self.reject("Please select a single file".to_string()));
        }
        if let Some(message) = files.iter().find_map(|file| slot.validate(file).err()) {
            return Err(self.reject(message));
        }

        log::debug!("{}: {} file(s) selected for {}", self.demo.id, files.len(), field);
        self.selection.replace(field, files);
        self.phase = UploadPhase::Idle;
        Ok(())
    }

    pub fn remove(&mut self, field: &str) -> Result<()> {
        if self.is_uploading() {
            return Err(Error::Busy);
        }
        self.selection.remove(field);
        Ok(())
    }

    /// 必須枠が揃っていて送信中でないか
    pub fn can_submit(&self) -> bool {
        !self.is_uploading() && self.selection.is_complete(self.demo.slots)
    }

    /// 送信を開始する
    ///
    /// 必須枠が欠けていればリクエストを作らずに `InputRejected`。
    pub fn begin_submit(&mut self) -> Result<Submission<F>> {
        if self.is_uploading() {
            return Err(Error::Busy);
        }
        if let Some(missing) = self.selection.first_missing(self.demo.slots) {
            let message = format!("{} is required", missing.label);
            return Err(self.reject(message));
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let (abort, registration) = AbortHandle::new_pair();
        self.in_flight = Some(RequestHandle { ticket, abort });
        self.phase = UploadPhase::Uploading;
        log::debug!("{}: uploading (ticket {})", self.demo.id, ticket);

        Ok(Submission {
            ticket,
            endpoint: self.demo.endpoint,
            parts: self.selection.to_parts(self.demo.slots),
            registration,
        })
    }

    /// 送信結果を反映し、分析イベントを返す
    ///
    /// 破棄後・中断済み・古いチケットの完了は無視して `None`。
    pub fn complete(&mut self, completion: Completion) -> Option<AnalyticsEvent> {
        if self.torn_down {
            log::debug!("{}: completion after teardown ignored", self.demo.id);
            return None;
        }
        match &self.in_flight {
            Some(handle) if handle.ticket == completion.ticket => {}
            _ => {
                log::debug!("{}: stale completion (ticket {}) ignored", self.demo.id, completion.ticket);
                return None;
            }
        }
        self.in_flight = None;

        let reply = match completion.outcome {
            Outcome::Reply(reply) => reply,
            Outcome::Transport(e) => {
                log::warn!("{}: {}", self.demo.id, e);
                return Some(self.fail(NETWORK_FAILURE_MESSAGE.to_string()));
            }
            Outcome::Aborted => {
                self.phase = UploadPhase::Idle;
                return None;
            }
        };

        if !reply.is_success() {
            log::warn!("{}: request failed with status {}", self.demo.id, reply.status);
            return Some(self.fail(api::error_message(&reply)));
        }

        match payload::decode::<R>(&reply) {
            Ok(result) => {
                log::debug!("{}: succeeded", self.demo.id);
                self.phase = UploadPhase::Succeeded(result);
                self.notices.push(Notice::success(self.demo.success_message));
                Some(self.event(AttemptOutcome::Success))
            }
            Err(e) => {
                log::warn!("{}: {}", self.demo.id, e);
                Some(self.fail(UNEXPECTED_RESPONSE_MESSAGE.to_string()))
            }
        }
    }

    fn fail(&mut self, message: String) -> AnalyticsEvent {
        self.notices.push(Notice::error(message.clone()));
        self.phase = UploadPhase::Failed(message);
        self.event(AttemptOutcome::Failure)
    }

    fn event(&self, outcome: AttemptOutcome) -> AnalyticsEvent {
        AnalyticsEvent::demo_attempt(self.demo.id, outcome, self.selection.file_count())
    }

    /// ページ破棄時に呼ぶ。送信中なら1回だけ中断し、通知は出さない
    ///
    /// 中断したリクエストがあれば `true`。
    pub fn teardown(&mut self) -> bool {
        self.torn_down = true;
        match self.in_flight.take() {
            Some(handle) => {
                log::debug!("{}: teardown cancelled ticket {}", self.demo.id, handle.ticket);
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// 選択・結果・エラーをすべて消して `Idle` に戻す
    ///
    /// 送信中なら黙って中断し、遅れて届いた応答は無視される。
    pub fn reset(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            log::debug!("{}: reset cancelled ticket {}", self.demo.id, handle.ticket);
            handle.cancel();
        }
        self.selection.clear();
        self.phase = UploadPhase::Idle;
    }

    /// 開始から完了までを一度に行う（CLI・テスト用）
    pub async fn submit<C>(&mut self, api: &ApiClient<C>) -> Result<Option<AnalyticsEvent>>
    where
        C: HttpClient<File = F>,
    {
        let submission = self.begin_submit()?;
        let completion = submission.send(api).await;
        Ok(self.complete(completion))
    }
}

impl<F, R> Drop for UploadController<F, R> {
    fn drop(&mut self) {
        // teardownを経ずに破棄された場合も送信中のリクエストは残さない
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos;
    use crate::http::mock::{MockFile, MockHttpClient, MB};
    use crate::http::RequestBody;
    use crate::notice::NoticeLevel;
    use crate::payload::{BankRecResult, InvoiceExtraction};
    use futures::executor::block_on;

    type BankRec = UploadController<MockFile, BankRecResult>;
    type Invoice = UploadController<MockFile, InvoiceExtraction>;

    const BANK_REC_REPLY: &str = r#"{
        "summary": {
            "total_bank_transactions": 45,
            "total_ledger_transactions": 43,
            "matched_count": 40,
            "unmatched_bank_count": 5,
            "unmatched_ledger_count": 3,
            "match_rate": 88.9
        },
        "matched_pairs": [],
        "unmatched_bank": [],
        "unmatched_ledger": []
    }"#;

    fn api(client: MockHttpClient) -> ApiClient<MockHttpClient> {
        ApiClient::new(client, "https://api.example.com/fn", "anon-key")
    }

    fn csv(name: &str) -> MockFile {
        MockFile::new(name, "text/csv", 3 * MB)
    }

    fn ready_bank_rec() -> BankRec {
        let mut controller = BankRec::new(&demos::BANK_REC);
        controller.select("bank_file", vec![csv("bank.csv")]).expect("bank");
        controller.select("ledger_file", vec![csv("ledger.csv")]).expect("ledger");
        controller
    }

    #[test]
    fn test_oversize_invoice_rejected() {
        let api = api(MockHttpClient::new());
        let mut controller = Invoice::new(&demos::INVOICE);

        let err = controller
            .select("file", vec![MockFile::new("scan.pdf", "application/pdf", 11 * MB)])
            .unwrap_err();

        assert_eq!(err.to_string(), "File size must be less than 10MB");
        assert!(controller.selection().is_empty());
        assert_eq!(*controller.phase(), UploadPhase::Idle);
        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "File size must be less than 10MB");

        // 何も選ばれていないので送信もされない
        assert!(block_on(controller.submit(&api)).is_err());
        assert_eq!(api.client().request_count(), 0);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut controller = BankRec::new(&demos::BANK_REC);
        let err = controller
            .select("bank_file", vec![MockFile::new("statement.pdf", "application/pdf", MB)])
            .unwrap_err();
        assert!(matches!(err, Error::InputRejected(_)));
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn test_multiple_files_in_single_slot_rejected() {
        let mut controller = BankRec::new(&demos::BANK_REC);
        let err = controller
            .select("bank_file", vec![csv("a.csv"), csv("b.csv")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a single file");
    }

    #[test]
    fn test_bad_receipt_rejects_whole_batch() {
        let mut controller: UploadController<MockFile, crate::payload::ExpenseResult> =
            UploadController::new(&demos::EXPENSES);
        let err = controller
            .select(
                "receipts",
                vec![
                    MockFile::new("ok.png", "image/png", MB),
                    MockFile::new("notes.txt", "text/plain", 10),
                ],
            )
            .unwrap_err();
        assert!(err.to_string().starts_with("notes.txt: Invalid file type"));
        assert!(controller.selection().files("receipts").is_empty());
    }

    #[test]
    fn test_incomplete_selection_issues_no_request() {
        let api = api(MockHttpClient::new().reply(200, BANK_REC_REPLY));
        let mut controller = BankRec::new(&demos::BANK_REC);
        controller.select("bank_file", vec![csv("bank.csv")]).expect("bank");
        assert!(!controller.can_submit());

        let err = block_on(controller.submit(&api)).unwrap_err();
        assert_eq!(err.to_string(), "General ledger is required");
        assert_eq!(api.client().request_count(), 0);
        assert!(!controller.is_uploading());
        assert!(controller.take_notices()[0].is_error());
    }

    #[test]
    fn test_bank_rec_success_shows_exact_counts() {
        let api = api(MockHttpClient::new().reply(200, BANK_REC_REPLY));
        let mut controller = ready_bank_rec();
        assert!(controller.can_submit());

        let event = block_on(controller.submit(&api)).expect("submit").expect("event");
        assert_eq!(event.outcome, AttemptOutcome::Success);
        assert_eq!(event.demo, "bank-rec");
        assert_eq!(event.file_count, 2);

        let result = controller.result().expect("succeeded");
        let cards = result.summary_cards();
        let values: Vec<&str> = cards.iter().take(5).map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["45", "43", "40", "5", "3"]);

        let notices = controller.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Success);

        let request = api.client().last_request().expect("sent");
        assert_eq!(request.url, "https://api.example.com/fn/analyze-bank-rec");
        assert_eq!(request.header_value("Authorization"), Some("Bearer anon-key"));
        match request.body {
            RequestBody::Multipart(parts) => {
                let fields: Vec<&str> = parts.iter().map(|p| p.field.as_str()).collect();
                assert_eq!(fields, vec!["bank_file", "ledger_file"]);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_server_error_message_surfaces() {
        let api = api(MockHttpClient::new().reply(500, r#"{"error":"Reconciliation failed"}"#));
        let mut controller = ready_bank_rec();

        let event = block_on(controller.submit(&api)).expect("submit").expect("event");
        assert_eq!(event.outcome, AttemptOutcome::Failure);
        assert_eq!(controller.error(), Some("Reconciliation failed"));
        assert!(controller.result().is_none());
        assert_eq!(controller.take_notices()[0].message, "Reconciliation failed");
        // 再送のために選択は残る
        assert!(controller.can_submit());
    }

    #[test]
    fn test_transport_failure_message() {
        let api = api(MockHttpClient::new().fail("dns lookup failed"));
        let mut controller = ready_bank_rec();
        block_on(controller.submit(&api)).expect("submit");
        assert_eq!(controller.error(), Some(NETWORK_FAILURE_MESSAGE));
    }

    #[test]
    fn test_unexpected_shape_fails() {
        let api = api(MockHttpClient::new().reply(200, r#"{"ok": true}"#));
        let mut controller = ready_bank_rec();
        block_on(controller.submit(&api)).expect("submit");
        assert_eq!(controller.error(), Some(UNEXPECTED_RESPONSE_MESSAGE));
    }

    #[test]
    fn test_busy_while_uploading() {
        let mut controller = ready_bank_rec();
        let _submission = controller.begin_submit().expect("begin");
        assert!(controller.is_uploading());
        assert!(!controller.can_submit());
        assert!(matches!(controller.begin_submit(), Err(Error::Busy)));
        assert!(matches!(controller.select("bank_file", vec![csv("x.csv")]), Err(Error::Busy)));
        assert!(matches!(controller.remove("bank_file"), Err(Error::Busy)));
    }

    #[test]
    fn test_teardown_cancels_once_silently() {
        let api = api(MockHttpClient::new().reply(200, BANK_REC_REPLY));
        let mut controller = ready_bank_rec();
        let submission = controller.begin_submit().expect("begin");
        controller.take_notices();

        assert!(controller.teardown());
        assert!(!controller.teardown());

        let completion = block_on(submission.send(&api));
        assert!(matches!(completion.outcome, Outcome::Aborted));
        assert!(controller.complete(completion).is_none());
        assert!(controller.take_notices().is_empty());
        assert!(controller.error().is_none());
        assert_eq!(api.client().request_count(), 0);
    }

    #[test]
    fn test_teardown_ignores_late_reply() {
        let mut controller = ready_bank_rec();
        let submission = controller.begin_submit().expect("begin");
        controller.teardown();

        let late = Completion {
            ticket: submission.ticket(),
            outcome: Outcome::Reply(HttpReply::new(200, BANK_REC_REPLY)),
        };
        assert!(controller.complete(late).is_none());
        assert!(controller.result().is_none());
    }

    #[test]
    fn test_reset_during_upload_drops_late_result() {
        let api = api(MockHttpClient::new().reply(200, BANK_REC_REPLY));
        let mut controller = ready_bank_rec();
        let submission = controller.begin_submit().expect("begin");

        controller.reset();
        assert_eq!(*controller.phase(), UploadPhase::Idle);

        let completion = block_on(submission.send(&api));
        assert!(controller.complete(completion).is_none());
        assert!(controller.result().is_none());
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut controller = ready_bank_rec();
        let first = controller.begin_submit().expect("first");
        controller.reset();
        controller.select("bank_file", vec![csv("bank.csv")]).expect("bank");
        controller.select("ledger_file", vec![csv("ledger.csv")]).expect("ledger");
        let second = controller.begin_submit().expect("second");
        assert_ne!(first.ticket(), second.ticket());

        let stale = Completion {
            ticket: first.ticket(),
            outcome: Outcome::Reply(HttpReply::new(500, r#"{"error":"old"}"#)),
        };
        assert!(controller.complete(stale).is_none());
        assert!(controller.is_uploading());

        let current = Completion {
            ticket: second.ticket(),
            outcome: Outcome::Reply(HttpReply::new(200, BANK_REC_REPLY)),
        };
        assert!(controller.complete(current).is_some());
        assert!(controller.result().is_some());
    }

    #[test]
    fn test_reset_from_every_state() {
        let api = api(
            MockHttpClient::new()
                .reply(200, BANK_REC_REPLY)
                .reply(500, r#"{"error":"Reconciliation failed"}"#),
        );

        // Idle(選択あり)
        let mut controller = ready_bank_rec();
        controller.reset();
        assert!(controller.selection().is_empty());
        assert_eq!(*controller.phase(), UploadPhase::Idle);

        // Succeeded
        let mut controller = ready_bank_rec();
        block_on(controller.submit(&api)).expect("submit");
        assert!(controller.result().is_some());
        controller.reset();
        assert!(controller.result().is_none());
        assert!(controller.selection().is_empty());

        // Failed
        let mut controller = ready_bank_rec();
        block_on(controller.submit(&api)).expect("submit");
        assert!(controller.error().is_some());
        controller.reset();
        assert!(controller.error().is_none());

        // 冪等
        controller.reset();
        assert_eq!(*controller.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_new_selection_clears_previous_error() {
        let api = api(MockHttpClient::new().reply(500, r#"{"error":"Reconciliation failed"}"#));
        let mut controller = ready_bank_rec();
        block_on(controller.submit(&api)).expect("submit");
        assert!(controller.error().is_some());

        controller.select("bank_file", vec![csv("bank-v2.csv")]).expect("reselect");
        assert!(controller.error().is_none());
        assert_eq!(controller.selection().files("bank_file")[0].name, "bank-v2.csv");
    }
}
