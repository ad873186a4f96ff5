//! JSON request/response shapes of the planning context.
//!
//! Requests are validated by hand rather than by typed deserialization so
//! that every malformed board or piece id becomes a `rejected` response,
//! never a fault.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stackbot_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid, PieceKind, Placement};

use crate::beam::BeamPlanner;

/// A "think" request: board snapshot plus upcoming pieces.
///
/// Everything but `id` is kept as raw JSON and checked by
/// [`PlanRequest::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Correlation identifier echoed in the response.
    pub id: u64,
    /// `BOARD_HEIGHT` rows of `BOARD_WIDTH` cell ids, top row first.
    #[serde(default)]
    pub board: Value,
    /// Piece id to place now.
    #[serde(default)]
    pub current: Value,
    /// Piece id after `current`; ignored when `queue` is given.
    #[serde(default)]
    pub next: Value,
    /// Piece ids after `current`.
    #[serde(default)]
    pub queue: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RequestError {
    #[display("request is not valid JSON: {reason}")]
    Malformed { reason: String },
    #[display("board is not an array")]
    BoardNotArray,
    #[display("board has {actual} rows, expected {BOARD_HEIGHT}")]
    WrongHeight { actual: usize },
    #[display("board row {row} is not an array")]
    RowNotArray { row: usize },
    #[display("board row {row} has {actual} cells, expected {BOARD_WIDTH}")]
    WrongWidth { row: usize, actual: usize },
    #[display("board cell ({column}, {row}) is not an integer in 0..=255")]
    InvalidCell { row: usize, column: usize },
    #[display("current piece is missing")]
    MissingCurrent,
    #[display("{field} is not a piece id")]
    InvalidPiece { field: &'static str },
    #[display("unknown piece id {id}")]
    UnknownPiece { id: u64 },
}

impl PlanRequest {
    /// Decodes one JSON request document.
    ///
    /// Text that is not a request object is answered right away with a
    /// rejection, carrying the request's id when one can be read.
    pub fn decode(text: &str) -> Result<Self, PlanResponse> {
        let reject = |reason: String, id: u64| {
            let error = RequestError::Malformed { reason };
            tracing::warn!(id, %error, "rejecting plan request");
            PlanResponse::rejected(id, &error)
        };
        let value: Value = serde_json::from_str(text).map_err(|e| reject(e.to_string(), 0))?;
        let id = value.get("id").and_then(Value::as_u64).unwrap_or(0);
        serde_json::from_value(value).map_err(|e| reject(e.to_string(), id))
    }

    /// Validates the request and returns the grid and the piece queue.
    pub fn validate(&self) -> Result<(Grid, Vec<PieceKind>), RequestError> {
        let grid = parse_board(&self.board)?;
        if self.current.is_null() {
            return Err(RequestError::MissingCurrent);
        }
        let mut pieces = vec![parse_piece(&self.current, "current")?];
        match (&self.queue, &self.next) {
            (Value::Null, Value::Null) => {}
            (Value::Null, next) => pieces.push(parse_piece(next, "next")?),
            (Value::Array(queue), _) => {
                for id in queue {
                    pieces.push(parse_piece(id, "queue")?);
                }
            }
            _ => return Err(RequestError::InvalidPiece { field: "queue" }),
        }
        Ok((grid, pieces))
    }
}

fn parse_piece(value: &Value, field: &'static str) -> Result<PieceKind, RequestError> {
    let id = value.as_u64().ok_or(RequestError::InvalidPiece { field })?;
    u8::try_from(id)
        .ok()
        .and_then(PieceKind::from_id)
        .ok_or(RequestError::UnknownPiece { id })
}

fn parse_board(board: &Value) -> Result<Grid, RequestError> {
    let rows = board.as_array().ok_or(RequestError::BoardNotArray)?;
    if rows.len() != BOARD_HEIGHT {
        return Err(RequestError::WrongHeight { actual: rows.len() });
    }
    let mut ids = Vec::with_capacity(BOARD_HEIGHT);
    for (row, cells) in rows.iter().enumerate() {
        let cells = cells.as_array().ok_or(RequestError::RowNotArray { row })?;
        if cells.len() != BOARD_WIDTH {
            return Err(RequestError::WrongWidth {
                row,
                actual: cells.len(),
            });
        }
        let row_ids = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                cell.as_u64()
                    .and_then(|id| u8::try_from(id).ok())
                    .ok_or(RequestError::InvalidCell { row, column })
            })
            .collect::<Result<Vec<_>, _>>()?;
        ids.push(row_ids);
    }
    Grid::from_cell_ids(&ids).map_err(|_| RequestError::BoardNotArray)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// A placement was chosen.
    Planned,
    /// Input was valid but the current piece cannot be placed.
    NoDecision,
    /// Input was malformed.
    Rejected,
}

/// Placement preview returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    /// Piece id (`1..=7`).
    pub piece: u8,
    pub rotation: u8,
    /// Leftmost column of the piece's bounding box.
    pub column: usize,
    /// Top row of the piece's bounding box.
    pub row: usize,
    /// Occupancy of the bounding box, top row first.
    pub matrix: Vec<Vec<bool>>,
}

impl From<&Placement> for Ghost {
    fn from(placement: &Placement) -> Self {
        Self {
            piece: placement.kind().id(),
            rotation: placement.rotation().as_u8(),
            column: placement.column(),
            row: placement.row(),
            matrix: placement.shape().matrix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: u64,
    pub mode: PlanMode,
    pub ghost: Option<Ghost>,
    pub open_area_delta: Option<i32>,
    pub reason: Option<String>,
}

impl PlanResponse {
    #[must_use]
    pub fn rejected(id: u64, error: &RequestError) -> Self {
        Self {
            id,
            mode: PlanMode::Rejected,
            ghost: None,
            open_area_delta: None,
            reason: Some(error.to_string()),
        }
    }
}

/// Validates `request`, runs the planner and builds the response.
#[must_use]
pub fn respond(planner: &BeamPlanner, request: &PlanRequest) -> PlanResponse {
    let (grid, queue) = match request.validate() {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(id = request.id, %error, "rejecting plan request");
            return PlanResponse::rejected(request.id, &error);
        }
    };
    match planner.plan(&grid, &queue) {
        Some(plan) => PlanResponse {
            id: request.id,
            mode: PlanMode::Planned,
            ghost: Some(Ghost::from(&plan.first)),
            open_area_delta: Some(plan.open_area_delta),
            reason: None,
        },
        None => PlanResponse {
            id: request.id,
            mode: PlanMode::NoDecision,
            ghost: None,
            open_area_delta: None,
            reason: Some(format!("no placement for piece {}", queue[0])),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn empty_board() -> Value {
        json!(vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT])
    }

    fn request(board: Value, current: Option<u8>) -> PlanRequest {
        PlanRequest {
            id: 7,
            board,
            current: json!(current),
            next: Value::Null,
            queue: Value::Null,
        }
    }

    #[test]
    fn test_queue_order() {
        let mut req = request(empty_board(), Some(2));
        req.next = json!(7);
        let (_, queue) = req.validate().unwrap();
        assert_eq!(queue, vec![PieceKind::O, PieceKind::T]);

        req.queue = json!([1, 3]);
        let (_, queue) = req.validate().unwrap();
        assert_eq!(queue, vec![PieceKind::O, PieceKind::I, PieceKind::S]);
    }

    #[test]
    fn test_board_cells_decode() {
        let mut rows = vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT];
        rows[19][0] = 7;
        rows[19][1] = 200;
        let (grid, _) = request(json!(rows), Some(1)).validate().unwrap();
        assert_eq!(
            grid.cell(0, 19),
            stackbot_engine::Block::Piece(PieceKind::T)
        );
        assert_eq!(grid.cell(1, 19), stackbot_engine::Block::Garbage);
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (request(json!("board"), Some(1)), RequestError::BoardNotArray),
            (
                request(json!(vec![vec![0; BOARD_WIDTH]; 3]), Some(1)),
                RequestError::WrongHeight { actual: 3 },
            ),
            (request(empty_board(), None), RequestError::MissingCurrent),
            (request(empty_board(), Some(9)), RequestError::UnknownPiece { id: 9 }),
        ];
        for (req, expected) in cases {
            assert_eq!(req.validate(), Err(expected));
        }

        let mut rows: Vec<Value> = vec![json!(vec![0; BOARD_WIDTH]); BOARD_HEIGHT];
        rows[4] = json!(5);
        assert_eq!(
            request(Value::Array(rows.clone()), Some(1)).validate(),
            Err(RequestError::RowNotArray { row: 4 })
        );
        rows[4] = json!(vec![0; BOARD_WIDTH - 1]);
        assert_eq!(
            request(Value::Array(rows.clone()), Some(1)).validate(),
            Err(RequestError::WrongWidth {
                row: 4,
                actual: BOARD_WIDTH - 1
            })
        );
        let mut row = vec![json!(0); BOARD_WIDTH];
        row[2] = json!(-1);
        rows[4] = Value::Array(row);
        assert_eq!(
            request(Value::Array(rows), Some(1)).validate(),
            Err(RequestError::InvalidCell { row: 4, column: 2 })
        );
    }

    #[test]
    fn test_piece_id_rejections() {
        let mut req = request(empty_board(), None);
        req.current = json!(300);
        assert_eq!(req.validate(), Err(RequestError::UnknownPiece { id: 300 }));

        req.current = json!("T");
        assert_eq!(
            req.validate(),
            Err(RequestError::InvalidPiece { field: "current" })
        );

        req.current = json!(1);
        req.queue = json!([1, -2]);
        assert_eq!(
            req.validate(),
            Err(RequestError::InvalidPiece { field: "queue" })
        );

        req.queue = json!("IO");
        assert_eq!(
            req.validate(),
            Err(RequestError::InvalidPiece { field: "queue" })
        );

        req.queue = Value::Null;
        req.next = json!(0);
        assert_eq!(req.validate(), Err(RequestError::UnknownPiece { id: 0 }));
    }

    #[test]
    fn test_decode_keeps_raw_piece_ids() {
        let board = empty_board();
        let text = json!({ "id": 4, "board": board, "current": 300 }).to_string();
        let req = PlanRequest::decode(&text).unwrap();
        assert_eq!(req.id, 4);
        let response = respond(&BeamPlanner::default(), &req);
        assert!(response.mode.is_rejected());
        assert_eq!(response.id, 4);
        assert_eq!(response.reason.as_deref(), Some("unknown piece id 300"));

        let text = json!({ "id": 5, "board": board, "current": "T" }).to_string();
        let response = respond(&BeamPlanner::default(), &PlanRequest::decode(&text).unwrap());
        assert!(response.mode.is_rejected());
        assert_eq!(response.id, 5);
    }

    #[test]
    fn test_decode_rejects_malformed_documents() {
        let rejected = PlanRequest::decode("{\"id\": 1, \"board\": [").unwrap_err();
        assert!(rejected.mode.is_rejected());
        assert_eq!(rejected.id, 0);

        let decoded = PlanRequest::decode(r#"{"id": 9, "extra": 1}"#).map(|r| r.id);
        assert_eq!(decoded, Ok(9));

        let rejected = PlanRequest::decode(r#"{"id": -3, "current": 1}"#).unwrap_err();
        assert_eq!(rejected.id, 0);
        assert!(rejected.reason.is_some());

        let rejected = PlanRequest::decode("[1, 2]").unwrap_err();
        assert!(rejected.mode.is_rejected());
    }

    #[test]
    fn test_respond_modes() {
        let planner = BeamPlanner::default();

        let planned = respond(&planner, &request(empty_board(), Some(2)));
        assert!(planned.mode.is_planned());
        let ghost = planned.ghost.unwrap();
        assert_eq!(ghost.piece, 2);
        assert_eq!(ghost.matrix, vec![vec![true, true], vec![true, true]]);
        assert_eq!(planned.id, 7);

        let rejected = respond(&planner, &request(Value::Null, Some(2)));
        assert!(rejected.mode.is_rejected());
        assert!(rejected.ghost.is_none());
        assert!(rejected.reason.is_some());

        let mut rows = vec![vec![0; BOARD_WIDTH]; BOARD_HEIGHT];
        for row in &mut rows {
            for cell in row.iter_mut().step_by(2) {
                *cell = 8;
            }
        }
        let stuck = respond(&planner, &request(json!(rows), Some(2)));
        assert!(stuck.mode.is_no_decision());
        assert!(stuck.ghost.is_none());
    }

    #[test]
    fn test_response_json_shape() {
        let response = PlanResponse::rejected(3, &RequestError::MissingCurrent);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["mode"], "rejected");
        assert_eq!(json["ghost"], Value::Null);
        assert_eq!(json["reason"], "current piece is missing");
    }
}
