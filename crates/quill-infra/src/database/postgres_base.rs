use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// Lookup, update and delete by primary key for any SeaORM entity whose
/// model converts to and from a domain type.
pub struct PostgresBaseRepository<E: EntityTrait> {
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> PostgresBaseRepository<E> {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Sort a SeaORM error into [`RepoError`] kinds.
pub(crate) fn repo_error(err: DbErr) -> RepoError {
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            // Postgres reports unique, not-null and check failures this way.
            if msg.contains("duplicate") || msg.contains("violates") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Into<sea_orm::Value> + Copy + Send + Sync + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let model = E::find_by_id(id).one(&self.db).await.map_err(repo_error)?;
        Ok(model.map(T::from))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        // UPDATE ... RETURNING; no matching row comes back as RecordNotUpdated.
        let active: E::ActiveModel = entity.into();
        let model = active.update(&self.db).await.map_err(repo_error)?;
        Ok(T::from(model))
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id).exec(&self.db).await.map_err(repo_error)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
