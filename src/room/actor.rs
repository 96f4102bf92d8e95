//! One task per room.
//!
//! The actor owns the [`Table`] outright; every mutation flows through its
//! mailbox, so actions from different connections are serialized without a
//! lock. The turn clock is a generation counter: arming the timer bumps the
//! generation and spawns a sleeper that mails a [`RoomMessage::TurnTimeout`]
//! back; any message from an older generation is ignored, so a timer never
//! fires for a turn that already ended.

use log::{error, info, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, sleep_until};

use crate::game::{
    ActionLogEntry, Chips, GameStateView, PlayerId, Winning,
    table::{ActionOutcome, Stage, Table, TableAction},
    view::WinnerSummary,
};

use super::{
    RoomId,
    broadcast::{Broadcaster, ChatMessage, Event},
    config::RoomConfig,
    messages::{ClientCommand, RoomMessage, RoomResponse, RoomSummary},
};

const INBOX_CAPACITY: usize = 100;
const MAX_CHAT_HISTORY: usize = 100;
const MAX_ACTION_HISTORY: usize = 50;
/// Action-log entries included in each snapshot.
const SNAPSHOT_LOG_ENTRIES: usize = 10;
const MAX_CHAT_CONTENT: usize = 200;

/// Cheap cloneable handle to a running room actor.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    pub room_id: RoomId,
}

impl RoomHandle {
    pub async fn send(&self, message: RoomMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| format!("room {} is no longer running", self.room_id))
    }
}

pub struct RoomActor {
    id: RoomId,
    config: RoomConfig,
    table: Table,
    inbox: mpsc::Receiver<RoomMessage>,
    /// Kept so timer tasks can mail the room back.
    self_sender: mpsc::Sender<RoomMessage>,
    broadcaster: Arc<dyn Broadcaster>,
    chat_history: VecDeque<ChatMessage>,
    action_log: VecDeque<ActionLogEntry>,
    turn_generation: u64,
    turn_deadline: Option<Instant>,
    is_closed: bool,
}

impl RoomActor {
    pub fn new(
        id: RoomId,
        config: RoomConfig,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = RoomHandle {
            sender: sender.clone(),
            room_id: id.clone(),
        };
        let table = Table::new(config.table_settings(&id));
        let actor = Self {
            id,
            config,
            table,
            inbox,
            self_sender: sender,
            broadcaster,
            chat_history: VecDeque::new(),
            action_log: VecDeque::new(),
            turn_generation: 0,
            turn_deadline: None,
            is_closed: false,
        };
        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("room {}: started", self.id);
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.is_closed {
                break;
            }
        }
        info!("room {}: stopped", self.id);
    }

    async fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join {
                player_id,
                name,
                respond_to,
            } => {
                let response = self.handle_join(player_id, name).await;
                let _ = respond_to.send(response);
            }
            RoomMessage::Leave {
                player_id,
                respond_to,
            } => {
                let response = self.handle_leave(&player_id).await;
                let _ = respond_to.send(response);
            }
            RoomMessage::Command { player_id, command } => {
                self.handle_command(&player_id, command).await;
            }
            RoomMessage::GetState {
                player_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.snapshot_for(&player_id));
            }
            RoomMessage::Summary { respond_to } => {
                let _ = respond_to.send(self.summary());
            }
            RoomMessage::TurnTimeout { generation } => {
                self.handle_turn_timeout(generation).await;
            }
            RoomMessage::Close { respond_to } => {
                self.is_closed = true;
                let _ = respond_to.send(());
            }
        }
    }

    async fn handle_join(&mut self, player_id: PlayerId, name: String) -> RoomResponse {
        match self
            .table
            .add_player(player_id, name.clone(), self.config.starting_chips)
        {
            Ok(_) => {
                info!("room {}: {name} joined", self.id);
                self.push_system_chat(format!("{name} joined the room")).await;
                self.broadcast_state(None).await;
                RoomResponse::Joined
            }
            Err(err) => {
                warn!("room {}: join rejected: {err}", self.id);
                RoomResponse::RoomFull
            }
        }
    }

    async fn handle_leave(&mut self, player_id: &str) -> RoomResponse {
        let had_the_turn = self.table.stage().is_betting()
            && self.table.current_player().is_some_and(|p| p.id == player_id);
        let Some(removed) = self.table.remove_player(player_id) else {
            return RoomResponse::NotInRoom;
        };
        info!("room {}: {} left", self.id, removed.name);
        self.push_system_chat(format!("{} left the room", removed.name))
            .await;
        let remaining = self.table.player_count();
        if remaining > 0 {
            if self.table.stage().is_betting()
                && (had_the_turn
                    || self.table.players_in_hand() <= 1
                    || self.table.is_betting_round_complete())
            {
                // The departure moved the turn or ended the hand/round.
                self.advance_after_action().await;
            } else {
                // Somebody else is still on the clock; leave it running.
                self.broadcast_state(None).await;
            }
        }
        RoomResponse::Left { remaining }
    }

    async fn handle_command(&mut self, player_id: &str, command: ClientCommand) {
        match command {
            ClientCommand::Chat { content } => self.handle_chat(player_id, content).await,
            ClientCommand::StartGame => self.handle_start_game(player_id).await,
            ClientCommand::Fold => self.handle_game_action(player_id, TableAction::Fold).await,
            ClientCommand::Check => self.handle_game_action(player_id, TableAction::Check).await,
            ClientCommand::Call => self.handle_game_action(player_id, TableAction::Call).await,
            ClientCommand::Bet { amount } => {
                self.handle_game_action(player_id, TableAction::Bet(amount))
                    .await;
            }
            ClientCommand::Raise { amount } => {
                self.handle_game_action(player_id, TableAction::Raise(amount))
                    .await;
            }
            ClientCommand::AllIn => {
                self.handle_game_action(player_id, TableAction::AllIn).await;
            }
        }
    }

    async fn handle_chat(&mut self, player_id: &str, content: String) {
        let Some(player) = self.table.player(player_id) else {
            return;
        };
        let name = player.name.clone();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }
        let content: String = trimmed.chars().take(MAX_CHAT_CONTENT).collect();
        self.push_chat(ChatMessage::chat(name, content)).await;
    }

    async fn handle_start_game(&mut self, player_id: &str) {
        if !self.table.is_owner(player_id) {
            warn!("room {}: start ignored, {player_id} is not the owner", self.id);
            return;
        }
        if self.table.stage() != Stage::Waiting {
            return;
        }
        match self.table.start_new_hand() {
            Ok(()) => {
                self.action_log.clear();
                self.push_system_chat("New hand dealt".to_string()).await;
                self.arm_turn_timer();
                self.broadcast_state(None).await;
            }
            Err(err) => {
                warn!("room {}: cannot start hand: {err}", self.id);
            }
        }
    }

    async fn handle_game_action(&mut self, player_id: &str, action: TableAction) {
        let name = match self.table.player(player_id) {
            Some(player) => player.name.clone(),
            None => return,
        };
        match self.table.apply_action(player_id, action) {
            ActionOutcome::Ignored => {
                warn!("room {}: ignored action from {player_id}", self.id);
            }
            ActionOutcome::Applied { action, amount } => {
                let amount = (amount > 0).then_some(amount);
                self.push_action(name, action.to_string(), amount);
                self.advance_after_action().await;
            }
        }
    }

    /// Drive the hand forward after any applied action (or a departure):
    /// pay uncontested pots, close out completed rounds, and hand the turn
    /// clock to whoever acts next.
    async fn advance_after_action(&mut self) {
        if let Some(winning) = self.table.award_uncontested() {
            self.cancel_turn_timer();
            self.push_system_chat(format!("{} wins {} chips", winning.name, winning.amount))
                .await;
            let winners = vec![winning.summary()];
            self.broadcaster
                .broadcast_to_room(&self.id, Event::Showdown {
                    winners: winners.clone(),
                })
                .await;
            // Snapshot while the table is still at showdown, then reset.
            self.broadcast_state(Some(winners)).await;
            self.table.end_hand();
            self.broadcast_state(None).await;
            return;
        }
        if self.table.is_betting_round_complete() {
            if self.table.active_player_count() <= 1 {
                self.run_out_board().await;
                return;
            }
            if self.table.stage() == Stage::River {
                self.settle_showdown().await;
                return;
            }
            if let Err(err) = self.table.advance_stage() {
                error!("room {}: cannot advance stage: {err}", self.id);
                return;
            }
            self.push_system_chat(format!("Dealing the {}", self.table.stage()))
                .await;
        }
        self.arm_turn_timer();
        self.broadcast_state(None).await;
    }

    /// Everyone is all-in (or down to one live actor): deal the remaining
    /// streets with a short pause between them, then settle.
    async fn run_out_board(&mut self) {
        self.cancel_turn_timer();
        loop {
            if self.table.stage() == Stage::River {
                self.settle_showdown().await;
                return;
            }
            if let Err(err) = self.table.advance_stage() {
                error!("room {}: run-out failed: {err}", self.id);
                return;
            }
            self.push_system_chat(format!("Dealing the {}", self.table.stage()))
                .await;
            self.broadcast_state(None).await;
            let pause = self.config.runout_pause();
            if !pause.is_zero() {
                sleep(pause).await;
            }
        }
    }

    async fn settle_showdown(&mut self) {
        self.cancel_turn_timer();
        match self.table.settle_showdown() {
            Ok(winnings) => {
                for winning in &winnings {
                    let line = match &winning.hand {
                        Some(hand) => format!(
                            "{} wins {} chips with {hand}",
                            winning.name, winning.amount,
                        ),
                        None => format!("{} wins {} chips", winning.name, winning.amount),
                    };
                    self.push_system_chat(line).await;
                }
                let winners: Vec<WinnerSummary> =
                    winnings.iter().map(Winning::summary).collect();
                self.broadcaster
                    .broadcast_to_room(&self.id, Event::Showdown {
                        winners: winners.clone(),
                    })
                    .await;
                // Snapshot first so every player sees the revealed hands,
                // then reset to waiting and snapshot again.
                self.broadcast_state(Some(winners)).await;
                self.table.end_hand();
                self.broadcast_state(None).await;
            }
            Err(err) => {
                error!("room {}: showdown failed: {err}", self.id);
                self.table.end_hand();
                self.broadcast_state(None).await;
            }
        }
    }

    fn arm_turn_timer(&mut self) {
        if !self.table.stage().is_betting() {
            self.cancel_turn_timer();
            return;
        }
        self.turn_generation += 1;
        let generation = self.turn_generation;
        let deadline = Instant::now() + self.config.turn_timeout();
        self.turn_deadline = Some(deadline);
        let sender = self.self_sender.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = sender.send(RoomMessage::TurnTimeout { generation }).await;
        });
    }

    /// Invalidates any sleeper already in flight.
    fn cancel_turn_timer(&mut self) {
        self.turn_generation += 1;
        self.turn_deadline = None;
    }

    async fn handle_turn_timeout(&mut self, generation: u64) {
        if generation != self.turn_generation || !self.table.stage().is_betting() {
            return;
        }
        let Some(player) = self.table.current_player() else {
            return;
        };
        if !player.can_act() {
            return;
        }
        let (player_id, name) = (player.id.clone(), player.name.clone());
        info!("room {}: {name} timed out, folding", self.id);
        if let ActionOutcome::Applied { .. } =
            self.table.apply_action(&player_id, TableAction::Fold)
        {
            self.push_action(name.clone(), "folds".to_string(), None);
            self.push_system_chat(format!("{name} ran out of time and folded"))
                .await;
            self.advance_after_action().await;
        }
    }

    fn remaining_secs(&self) -> u64 {
        if !self.table.stage().is_betting() {
            return 0;
        }
        self.turn_deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()).as_secs())
            .unwrap_or(0)
    }

    async fn push_chat(&mut self, message: ChatMessage) {
        self.chat_history.push_back(message.clone());
        while self.chat_history.len() > MAX_CHAT_HISTORY {
            self.chat_history.pop_front();
        }
        self.broadcaster
            .broadcast_to_room(&self.id, Event::Chat(message))
            .await;
    }

    async fn push_system_chat(&mut self, content: String) {
        self.push_chat(ChatMessage::system(content)).await;
    }

    fn push_action(&mut self, player: String, action: String, amount: Option<Chips>) {
        self.action_log.push_back(ActionLogEntry {
            player,
            action,
            amount,
        });
        while self.action_log.len() > MAX_ACTION_HISTORY {
            self.action_log.pop_front();
        }
    }

    /// Each player gets their own filtered snapshot.
    async fn broadcast_state(&self, winners: Option<Vec<WinnerSummary>>) {
        for player in self.table.players() {
            if let Some(mut view) = self.snapshot_for(&player.id) {
                view.winners = winners.clone();
                self.broadcaster
                    .send_to_player(&self.id, &player.id, Event::GameState(Box::new(view)))
                    .await;
            }
        }
    }

    fn snapshot_for(&self, player_id: &str) -> Option<GameStateView> {
        let mut view = self.table.view_for(player_id)?;
        view.remaining_secs = self.remaining_secs();
        view.action_log = self
            .action_log
            .iter()
            .rev()
            .take(SNAPSHOT_LOG_ENTRIES)
            .rev()
            .cloned()
            .collect();
        Some(view)
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.config.name.clone(),
            player_count: self.table.player_count(),
            max_players: self.config.max_players,
            stage: self.table.stage(),
            betting_mode: self.config.betting_mode,
        }
    }
}
