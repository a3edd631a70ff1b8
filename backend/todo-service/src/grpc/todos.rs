use std::sync::Arc;
use std::time::Instant;
use tonic::{Request, Response, Status};
use tracing::info;

use super::caller;
use super::pb::todo_service_server::TodoService;
use super::pb::{
    CreateTodoRequest, DeleteTodoRequest, Empty, GetTodoByIdRequest, GetTodoByUserIdRequest,
    Todo, TodoList, UpdateTodoRequest,
};
use crate::db::TodoRepository;
use crate::error::ServiceError;
use crate::models::{NewTodo, TodoUpdate};
use crate::validators::{parse_uuid, require_non_empty};

/// TodoService implementation
#[derive(Clone)]
pub struct TodoServiceHandler {
    todos: Arc<dyn TodoRepository>,
}

impl TodoServiceHandler {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }
}

fn todo_not_found() -> Status {
    ServiceError::NotFound("todo".to_string()).into()
}

#[tonic::async_trait]
impl TodoService for TodoServiceHandler {
    async fn get_all_todos(&self, request: Request<Empty>) -> Result<Response<TodoList>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;

        let todos = self.todos.list().await?;

        info!(
            subject = %subject,
            count = todos.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GetAllTodos"
        );
        Ok(Response::new(TodoList {
            todos: todos.into_iter().map(Into::into).collect(),
        }))
    }

    async fn get_todo_by_id(
        &self,
        request: Request<GetTodoByIdRequest>,
    ) -> Result<Response<Todo>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;
        let id = parse_uuid("id", &request.get_ref().id)?;

        let todo = self.todos.find_by_id(id).await?.ok_or_else(todo_not_found)?;

        info!(
            subject = %subject,
            todo_id = %id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GetTodoById"
        );
        Ok(Response::new(todo.into()))
    }

    async fn get_todo_by_user_id(
        &self,
        request: Request<GetTodoByUserIdRequest>,
    ) -> Result<Response<TodoList>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;
        let user_id = parse_uuid("user_id", &request.get_ref().user_id)?;

        let todos = self.todos.list_by_user(user_id).await?;

        info!(
            subject = %subject,
            user_id = %user_id,
            count = todos.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GetTodoByUserId"
        );
        Ok(Response::new(TodoList {
            todos: todos.into_iter().map(Into::into).collect(),
        }))
    }

    async fn create_todo(
        &self,
        request: Request<CreateTodoRequest>,
    ) -> Result<Response<Todo>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;
        let req = request.into_inner();

        require_non_empty("description", &req.description)?;
        let user_id = parse_uuid("user_id", &req.user_id)?;

        let todo = self
            .todos
            .create(NewTodo {
                description: req.description,
                completed: req.completed,
                user_id,
            })
            .await?;

        info!(
            subject = %subject,
            todo_id = %todo.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "CreateTodo"
        );
        Ok(Response::new(todo.into()))
    }

    async fn update_todo(
        &self,
        request: Request<UpdateTodoRequest>,
    ) -> Result<Response<Todo>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;
        let req = request.into_inner();

        let id = parse_uuid("id", &req.id)?;
        let user_id = parse_uuid("user_id", &req.user_id)?;
        require_non_empty("description", &req.description)?;

        let todo = self
            .todos
            .update(TodoUpdate {
                id,
                description: req.description,
                completed: req.completed,
                user_id,
            })
            .await?
            .ok_or_else(todo_not_found)?;

        info!(
            subject = %subject,
            todo_id = %id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "UpdateTodo"
        );
        Ok(Response::new(todo.into()))
    }

    async fn delete_todo(
        &self,
        request: Request<DeleteTodoRequest>,
    ) -> Result<Response<Empty>, Status> {
        let started = Instant::now();
        let subject = caller(&request)?;
        let id = parse_uuid("id", &request.get_ref().id)?;

        if !self.todos.delete(id).await? {
            return Err(todo_not_found());
        }

        info!(
            subject = %subject,
            todo_id = %id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "DeleteTodo"
        );
        Ok(Response::new(Empty {}))
    }
}
