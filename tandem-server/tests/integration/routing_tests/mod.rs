mod test_sender_is_stamped;
mod test_unroutable_signal_dropped;
