use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::domain::{NewReservation, ReservationPayload};
use crate::entities::reservations;
use crate::error::ServiceError;
use crate::routes::STATUS_OK;
use crate::startup::AppState;

#[derive(serde::Serialize, Debug)]
pub struct ReservationView {
    pub id: Uuid,
    pub user_id: i32,
    pub event_id: i32,
    /// `%m/%d/%Y`
    pub create_date: String,
}

impl From<reservations::Model> for ReservationView {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            create_date: model.create_date.format("%m/%d/%Y").to_string(),
        }
    }
}

#[derive(serde::Serialize, Debug)]
pub struct ReservationResponse {
    pub status: &'static str,
    pub message: String,
    pub reservation: ReservationView,
}

#[derive(serde::Serialize, Debug)]
pub struct ReservationListResponse {
    pub status: &'static str,
    pub message: String,
    pub reservations: Vec<ReservationView>,
}

/// 等值过滤条件，缺省字段匹配全部
#[derive(serde::Deserialize, Debug, Default, Clone, Copy)]
pub struct ReservationFilter {
    pub user_id: Option<i32>,
    pub event_id: Option<i32>,
}

#[tracing::instrument(
    name = "创建一个新的预约",
    skip(state, payload),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReservationPayload>, JsonRejection>,
) -> Result<Json<ReservationResponse>, ServiceError> {
    let Json(payload) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;
    let new_reservation = NewReservation::try_from(payload).map_err(ServiceError::Validation)?;

    let reservation = insert_reservation(&state.db, new_reservation).await?;
    Ok(Json(ReservationResponse {
        status: STATUS_OK,
        message: "Reservation successfully created".to_string(),
        reservation: reservation.into(),
    }))
}

#[tracing::instrument(
    name = "查询预约列表",
    skip(state, filter),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ReservationFilter>, QueryRejection>,
) -> Result<Json<ReservationListResponse>, ServiceError> {
    let Query(filter) = filter.map_err(|e| ServiceError::Validation(e.body_text()))?;

    let reservations = select_reservations(&state.db, filter).await?;
    Ok(Json(ReservationListResponse {
        status: STATUS_OK,
        message: format!("{} reservation(s) found", reservations.len()),
        reservations: reservations.into_iter().map(ReservationView::from).collect(),
    }))
}

#[tracing::instrument(
    name = "获取单个预约",
    skip(state, id),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ReservationResponse>, ServiceError> {
    let Path(id) = id.map_err(|e| ServiceError::Validation(e.body_text()))?;

    let reservation = find_reservation(&state.db, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("reservation {id} does not exist")))?;
    Ok(Json(ReservationResponse {
        status: STATUS_OK,
        message: "Reservation found".to_string(),
        reservation: reservation.into(),
    }))
}

#[tracing::instrument(name = "保存预约", skip(db))]
pub async fn insert_reservation(
    db: &DatabaseConnection,
    new_reservation: NewReservation,
) -> Result<reservations::Model, DbErr> {
    let reservation = reservations::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new_reservation.user_id),
        event_id: Set(new_reservation.event_id),
        create_date: Set(chrono::Utc::now()),
        update_date: Set(None),
    };

    reservation.insert(db).await.map_err(|e| {
        tracing::error!("执行插入语句失败: {:?}", e);
        e
    })
}

#[tracing::instrument(name = "按条件筛选预约", skip(db))]
pub async fn select_reservations(
    db: &DatabaseConnection,
    filter: ReservationFilter,
) -> Result<Vec<reservations::Model>, DbErr> {
    let condition = Condition::all()
        .add_option(filter.user_id.map(|id| reservations::Column::UserId.eq(id)))
        .add_option(filter.event_id.map(|id| reservations::Column::EventId.eq(id)));

    reservations::Entity::find()
        .filter(condition)
        .order_by_asc(reservations::Column::CreateDate)
        .all(db)
        .await
}

pub async fn find_reservation(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<reservations::Model>, DbErr> {
    reservations::Entity::find_by_id(id).one(db).await
}
