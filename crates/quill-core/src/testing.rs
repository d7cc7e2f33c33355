//! Test doubles for the ports, with call counting and failure injection.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{
    DeleteOutcome, ImageFile, Post, PostField, PostId, PostPatch, UploadedImage,
};
use crate::editor::EditorNotifier;
use crate::error::{RelayError, RepoError};
use crate::ports::{PostStore, UploadRelay};

#[derive(Default)]
pub(crate) struct FakeStore {
    pub records: Mutex<BTreeMap<PostId, Post>>,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub next_id: AtomicUsize,
}

impl FakeStore {
    pub fn seed(&self, post: Post) {
        self.records.lock().unwrap().insert(post.id.clone(), post);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, id: &PostId) -> Option<Post> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn only(&self) -> Post {
        let records = self.records.lock().unwrap();
        assert_eq!(records.len(), 1, "expected exactly one record");
        records.values().next().cloned().unwrap()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Connection("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for FakeStore {
    async fn insert(&self, patch: PostPatch) -> Result<PostId, RepoError> {
        self.check_write()?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = PostId::new(format!("post-{n}"));
        self.seed(Post::from_patch(id.clone(), patch));
        Ok(id)
    }

    async fn update(&self, id: &PostId, patch: PostPatch, merge: bool) -> Result<(), RepoError> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        if merge {
            let post = records.get_mut(id).ok_or(RepoError::NotFound)?;
            patch.apply_to(post);
        } else {
            records.insert(id.clone(), Post::from_patch(id.clone(), patch));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.get(id))
    }

    async fn query_by_field(&self, field: PostField) -> Result<Vec<Post>, RepoError> {
        let records = self.records.lock().unwrap();
        Ok(records.values().filter(|p| field.matches(p)).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), RepoError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepoError::Query("permission denied".into()));
        }
        match self.records.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeRelay {
    pub failing: HashSet<String>,
    pub uploaded: Mutex<Vec<String>>,
    pub hosted: Mutex<HashSet<String>>,
}

impl FakeRelay {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl UploadRelay for FakeRelay {
    async fn upload_one(
        &self,
        file: &ImageFile,
        _locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError> {
        self.uploaded.lock().unwrap().push(file.name.clone());
        if self.failing.contains(&file.name) {
            return Err(RelayError::Upload(format!("{} rejected", file.name)));
        }
        let id = format!("img-{}", file.name);
        self.hosted.lock().unwrap().insert(id.clone());
        Ok(UploadedImage {
            url: format!("https://images.test/{}", file.name),
            id,
            name: None,
        })
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, RelayError> {
        if self.hosted.lock().unwrap().remove(id) {
            Ok(DeleteOutcome::ok())
        } else {
            Err(RelayError::NotFound)
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub events: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl EditorNotifier for RecordingNotifier {
    fn draft_created(&self, id: &PostId) {
        self.push(format!("created:{id}"));
    }

    fn navigate_to_listing(&self) {
        self.push("navigate".into());
    }

    fn validation_failed(&self, message: &str) {
        self.push(format!("invalid:{message}"));
    }

    fn upload_failed(&self, file_name: &str, _message: &str) {
        self.push(format!("upload_failed:{file_name}"));
    }

    fn auth_required(&self) {
        self.push("auth_required".into());
    }
}
