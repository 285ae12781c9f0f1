//! In-memory backend used by unit tests
//!
//! Records every call, can fail selected operations, and can hold any
//! operation behind a oneshot gate so tests control completion order.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::api::{ApiError, ApiResult, ApplyAllRequest, Backend};
use crate::models::*;

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub jobs: Mutex<Vec<Job>>,
    pub resumes: Mutex<Vec<Resume>>,
    pub applications: Mutex<Vec<Application>>,
    pub transcripts: Mutex<HashMap<SessionId, Transcript>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
    next_id: Mutex<i64>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(100),
            ..Self::default()
        }
    }

    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        *self.jobs.lock().unwrap() = jobs;
        self
    }

    pub fn with_resumes(self, resumes: Vec<Resume>) -> Self {
        *self.resumes.lock().unwrap() = resumes;
        self
    }

    pub fn with_applications(self, applications: Vec<Application>) -> Self {
        *self.applications.lock().unwrap() = applications;
        self
    }

    /// Make every call to `op` fail with a backend error
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Hold the next call to `op` until the returned sender fires
    pub fn gate(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose description starts with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    async fn enter(&self, op: &'static str, detail: String) -> ApiResult<()> {
        let call = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{} {}", op, detail)
        };
        self.calls.lock().unwrap().push(call);

        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(|queue| queue.pop_front());
        if let Some(rx) = gate {
            let _ = rx.await;
        }

        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Backend {
                status: 500,
                message: format!("{} failed", op),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_jobs(&self) -> ApiResult<Vec<Job>> {
        self.enter("list_jobs", String::new()).await?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn create_job(&self, job: &NewJob) -> ApiResult<Job> {
        self.enter("create_job", job.title.clone()).await?;
        let mut created = Job::new(self.next_id(), job.title.clone(), job.company.clone());
        created.link = job.link.clone();
        created.description = Some(job.description.clone());
        created.source = job.source.clone();
        self.jobs.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_job(&self, id: JobId) -> ApiResult<()> {
        self.enter("delete_job", id.to_string()).await?;
        self.jobs.lock().unwrap().retain(|j| j.id != id);
        Ok(())
    }

    async fn search_jobs(&self, keywords: &str) -> ApiResult<String> {
        self.enter("search_jobs", keywords.to_string()).await?;
        Ok(format!("Found jobs for {}", keywords))
    }

    async fn apply_all(&self, request: &ApplyAllRequest) -> ApiResult<String> {
        let detail = serde_json::to_string(request).unwrap_or_default();
        self.enter("apply_all", detail).await?;
        Ok("Processed 3 jobs. Sent 0 emails.".to_string())
    }

    async fn list_resumes(&self) -> ApiResult<Vec<Resume>> {
        self.enter("list_resumes", String::new()).await?;
        Ok(self.resumes.lock().unwrap().clone())
    }

    async fn create_resume(&self, resume: &NewResume) -> ApiResult<Resume> {
        self.enter("create_resume", resume.name.clone()).await?;
        let created = Resume::new(self.next_id(), resume.name.clone());
        self.resumes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_applications(&self) -> ApiResult<Vec<Application>> {
        self.enter("list_applications", String::new()).await?;
        Ok(self.applications.lock().unwrap().clone())
    }

    async fn create_application(&self, job_id: JobId, resume_id: ResumeId) -> ApiResult<TrackingId> {
        self.enter("create_application", format!("{} {}", job_id, resume_id))
            .await?;
        let id = self.next_id();
        let job = self.jobs.lock().unwrap().iter().find(|j| j.id == job_id).cloned();
        let mut app = Application::new(id, ApplicationStatus::Draft);
        app.job = job;
        self.applications.lock().unwrap().push(app);
        Ok(id)
    }

    async fn update_status(&self, id: TrackingId, status: ApplicationStatus) -> ApiResult<Application> {
        self.enter("update_status", format!("{} {}", id, status)).await?;
        let mut apps = self.applications.lock().unwrap();
        let app = apps
            .iter_mut()
            .find(|a| a.tracking_id == id)
            .ok_or_else(|| ApiError::Backend {
                status: 404,
                message: "Not found.".to_string(),
            })?;
        app.status = status;
        Ok(app.clone())
    }

    async fn generate_code(&self, id: TrackingId, prompt: &str) -> ApiResult<String> {
        self.enter("generate_code", format!("{} {}", id, prompt)).await?;
        Ok(format!("% tailored for {}\n\\documentclass{{article}}", id))
    }

    async fn generate_pdf(&self, id: TrackingId, _latex_code: &str) -> ApiResult<String> {
        self.enter("generate_pdf", id.to_string()).await?;
        Ok(format!("/media/final_resumes/{}.pdf", id))
    }

    async fn generate_email_draft(&self, id: TrackingId) -> ApiResult<EmailDraft> {
        self.enter("generate_email_draft", id.to_string()).await?;
        Ok(EmailDraft {
            hr_email: "hr@acme.test".to_string(),
            email_body: "Dear Hiring Manager".to_string(),
        })
    }

    async fn send_email(&self, id: TrackingId, draft: &EmailDraft) -> ApiResult<()> {
        self.enter("send_email", format!("{} {}", id, draft.hr_email)).await?;
        if let Some(app) = self
            .applications
            .lock()
            .unwrap()
            .iter_mut()
            .find(|a| a.tracking_id == id)
        {
            app.status = ApplicationStatus::Sent;
        }
        Ok(())
    }

    async fn analyze_match(&self, id: TrackingId) -> ApiResult<MatchAnalysis> {
        self.enter("analyze_match", id.to_string()).await?;
        Ok(MatchAnalysis {
            score: 82.0,
            tip: "Mention Kubernetes".to_string(),
        })
    }

    async fn upload_final(&self, id: TrackingId, _file: &ResumeFile) -> ApiResult<()> {
        self.enter("upload_final", id.to_string()).await
    }

    async fn start_interview(&self, job_id: JobId) -> ApiResult<InterviewStart> {
        self.enter("start_interview", job_id.to_string()).await?;
        let session_id = self.next_id();
        let transcript = Transcript::new(vec![Turn::assistant("Tell me about yourself?")]);
        self.transcripts
            .lock()
            .unwrap()
            .insert(session_id, transcript.clone());
        Ok(InterviewStart {
            session_id,
            messages: transcript,
        })
    }

    async fn interview_chat(&self, session_id: SessionId, message: &str) -> ApiResult<Transcript> {
        self.enter("interview_chat", format!("{} {}", session_id, message))
            .await?;
        let mut transcripts = self.transcripts.lock().unwrap();
        let transcript = transcripts.entry(session_id).or_default();
        transcript.push(Turn::user(message));
        transcript.push(Turn::assistant(format!("Why do you say \"{}\"?", message)));
        Ok(transcript.clone())
    }

    async fn analyze_answer(
        &self,
        session_id: SessionId,
        question: &str,
        answer: &str,
    ) -> ApiResult<AnswerAnalysis> {
        self.enter(
            "analyze_answer",
            format!("{} {} | {}", session_id, question, answer),
        )
        .await?;
        Ok(AnswerAnalysis {
            rating: "Strong".to_string(),
            communication: Communication {
                tone: "Confident".to_string(),
            },
            feedback_summary: "Clear".to_string(),
            improved_version: answer.to_string(),
        })
    }

    async fn login(&self, username: &str, _password: &str) -> ApiResult<String> {
        self.enter("login", username.to_string()).await?;
        Ok("Logged in".to_string())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.enter("logout", String::new()).await
    }

    async fn debug_log(&self, msg: &str, context: &str) -> ApiResult<()> {
        self.enter("debug_log", format!("[{}] {}", context, msg)).await
    }

    fn resolve_media_url(&self, path: &str) -> String {
        format!("http://backend.test{}", path)
    }
}

pub(crate) fn job(id: JobId, title: &str, company: &str) -> Job {
    Job::new(id, title, company)
}

pub(crate) fn app(id: TrackingId, status: ApplicationStatus) -> Application {
    Application::new(id, status).with_job(job(id * 10, "Engineer", "Acme"))
}
