use rusve_proto::pb::{
    AuthRequest, Email, File, FileId, FileType, Note, NoteId, TargetId, User, UserId, UserIds,
    UserRole,
};
use rusve_proto::{
    NotesService, NotesServiceServer, UsersService, UsersServiceServer, UtilsService,
    UtilsServiceServer,
};
use tonic::service::Routes;
use tonic::{Request, Response, Status};

type ResponseStream<T> = tokio_stream::Iter<std::vec::IntoIter<Result<T, Status>>>;

pub const NOW: &str = "2024-06-01 12:00:00.0 +00:00:00";

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        created: NOW.to_string(),
        updated: NOW.to_string(),
        email: format!("{id}@rusve.test"),
        role: UserRole::RoleUser as i32,
        name: format!("User {id}"),
        ..Default::default()
    }
}

pub fn note(id: &str, user_id: &str) -> Note {
    Note {
        id: id.to_string(),
        user_id: user_id.to_string(),
        created: NOW.to_string(),
        updated: NOW.to_string(),
        deleted: None,
        title: format!("Title {id}"),
        content: format!("Content {id}"),
        user: None,
    }
}

pub fn file(id: &str, target_id: &str) -> File {
    File {
        id: id.to_string(),
        created: NOW.to_string(),
        updated: NOW.to_string(),
        deleted: None,
        target_id: target_id.to_string(),
        name: format!("{id}.bin"),
        r#type: FileType::Document as i32,
        buffer: vec![0xde, 0xad, 0xbe, 0xef],
    }
}

/// Every service mounted on one router, usable as a single tower service.
pub fn routes() -> Routes {
    Routes::new(UsersServiceServer::new(UsersServiceImpl))
        .add_service(NotesServiceServer::new(NotesServiceImpl))
        .add_service(UtilsServiceServer::new(UtilsServiceImpl))
}

pub struct UsersServiceImpl;

#[tonic::async_trait]
impl UsersService for UsersServiceImpl {
    type GetUsersStream = ResponseStream<User>;

    async fn auth(&self, req: Request<AuthRequest>) -> Result<Response<User>, Status> {
        let req = req.into_inner();
        if req.sub.is_empty() {
            return Err(Status::unauthenticated("Missing subject"));
        }
        Ok(Response::new(User {
            email: req.email,
            sub: req.sub,
            ..user("user-1")
        }))
    }

    async fn get_user(&self, req: Request<UserId>) -> Result<Response<User>, Status> {
        let user_id = req.into_inner().user_id;
        if user_id.is_empty() {
            return Err(Status::not_found("User not found"));
        }
        Ok(Response::new(user(&user_id)))
    }

    async fn get_users(
        &self,
        req: Request<UserIds>,
    ) -> Result<Response<Self::GetUsersStream>, Status> {
        let users: Vec<_> = req
            .into_inner()
            .user_ids
            .iter()
            .map(|id| Ok(user(id)))
            .collect();
        Ok(Response::new(tokio_stream::iter(users)))
    }

    async fn update_user(&self, req: Request<User>) -> Result<Response<User>, Status> {
        Ok(Response::new(req.into_inner()))
    }
}

pub struct NotesServiceImpl;

#[tonic::async_trait]
impl NotesService for NotesServiceImpl {
    type GetNotesStream = ResponseStream<Note>;

    async fn get_notes(
        &self,
        req: Request<UserId>,
    ) -> Result<Response<Self::GetNotesStream>, Status> {
        let user_id = req.into_inner().user_id;
        let notes = vec![Ok(note("note-1", &user_id)), Ok(note("note-2", &user_id))];
        Ok(Response::new(tokio_stream::iter(notes)))
    }

    async fn create_note(&self, req: Request<Note>) -> Result<Response<Note>, Status> {
        let mut note = req.into_inner();
        if note.id.is_empty() {
            note.id = "note-new".to_string();
        }
        note.created = NOW.to_string();
        note.updated = NOW.to_string();
        Ok(Response::new(note))
    }

    async fn delete_note(&self, req: Request<NoteId>) -> Result<Response<Note>, Status> {
        let req = req.into_inner();
        if req.note_id != "note-1" {
            return Err(Status::not_found("Note not found"));
        }
        let mut note = note(&req.note_id, &req.user_id);
        note.deleted = Some(NOW.to_string());
        Ok(Response::new(note))
    }
}

pub struct UtilsServiceImpl;

#[tonic::async_trait]
impl UtilsService for UtilsServiceImpl {
    type GetFilesStream = ResponseStream<File>;

    async fn get_files(
        &self,
        req: Request<TargetId>,
    ) -> Result<Response<Self::GetFilesStream>, Status> {
        let target_id = req.into_inner().target_id;
        let files = vec![Ok(file("file-1", &target_id))];
        Ok(Response::new(tokio_stream::iter(files)))
    }

    async fn get_file(&self, req: Request<FileId>) -> Result<Response<File>, Status> {
        let req = req.into_inner();
        Ok(Response::new(file(&req.file_id, &req.target_id)))
    }

    async fn create_file(&self, req: Request<File>) -> Result<Response<File>, Status> {
        let mut file = req.into_inner();
        file.id = "file-new".to_string();
        Ok(Response::new(file))
    }

    async fn delete_file(&self, req: Request<FileId>) -> Result<Response<File>, Status> {
        let req = req.into_inner();
        let mut file = file(&req.file_id, &req.target_id);
        file.mark_deleted(NOW);
        Ok(Response::new(file))
    }

    async fn send_email(&self, req: Request<Email>) -> Result<Response<Email>, Status> {
        let authorization = req
            .metadata()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if authorization != "Bearer secret" {
            return Err(Status::permission_denied("Missing token"));
        }
        let mut email = req.into_inner();
        email.id = "email-1".to_string();
        Ok(Response::new(email))
    }
}
